use sarge::ArgumentType;

use crate::error::ConfigError;
use crate::result::JoinType;

impl ArgumentType for JoinType {
    type Error = ConfigError;

    // No default: an absent `--join` leaves a configuration file's choice alone
    fn from_value(val: Option<&str>) -> sarge::ArgResult<Self> {
        let raw = val?.trim();
        Some(JoinType::from_str(raw).ok_or_else(|| ConfigError::InvalidJoinType(raw.to_string())))
    }
}
