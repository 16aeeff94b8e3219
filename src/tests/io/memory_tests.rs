//! Tests for in-memory IO implementations.

use std::io::{Read, Write};

use crate::{InMemorySink, InMemorySource, InputProvider, OutputTarget};

#[test]
fn in_memory_source_reads_data() {
    let src = InMemorySource::from_string("id", "hello");
    assert_eq!(src.id(), "id");

    let mut reader = src.open().expect("open in-memory source");
    let mut buf = String::new();
    reader.read_to_string(&mut buf).unwrap();
    assert_eq!(buf, "hello");
}

#[test]
fn chunked_source_limits_each_read() {
    let src = InMemorySource::from_string("id", "abcdefg").with_chunk_size(3);
    let mut reader = src.open().unwrap();
    let mut buf = [0u8; 16];

    let mut sizes = Vec::new();
    loop {
        let n = reader.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        sizes.push(n);
    }
    assert_eq!(sizes, [3, 3, 1]);
}

#[test]
fn every_open_starts_from_the_beginning() {
    let src = InMemorySource::new("id", b"xy".to_vec());
    for _ in 0..2 {
        let mut data = Vec::new();
        src.open().unwrap().read_to_end(&mut data).unwrap();
        assert_eq!(data, b"xy");
    }
}

#[test]
fn in_memory_sink_collects_lines() {
    let sink = InMemorySink::new("out");
    {
        let mut w = sink.open().unwrap();
        w.write_all(b"one\ntwo\n").unwrap();
    }
    let mut clone = sink.clone();
    clone.write_all(b"three\n").unwrap();

    assert_eq!(sink.lines(), ["one", "two", "three"]);
    assert_eq!(sink.contents_string(), "one\ntwo\nthree\n");

    sink.clear();
    assert!(sink.contents().is_empty());
}
