use super::*;

use rand::Rng;
use rand::seq::SliceRandom;
use simple_sds::serialize;

//-----------------------------------------------------------------------------

// Random GFA-like content with a mix of line types.
fn random_gfa(lines: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let types = [b'H', b'S', b'L', b'P', b'W'];
    let mut result = Vec::new();
    for i in 0..lines {
        let line_type = *types.choose(&mut rng).unwrap();
        result.push(line_type);
        result.push(b'\t');
        result.extend_from_slice(i.to_string().as_bytes());
        result.push(b'\t');
        let len = rng.gen_range(0..200);
        for _ in 0..len {
            result.push(*b"ACGT".choose(&mut rng).unwrap());
        }
        result.push(b'\n');
    }
    result
}

// Line offsets computed directly from the content.
fn true_offsets(content: &[u8]) -> Vec<(u8, u64)> {
    let mut result = Vec::new();
    let mut start = true;
    for (offset, &c) in content.iter().enumerate() {
        if c == b'\n' {
            start = true;
        } else if start {
            result.push((c, offset as u64));
            start = false;
        }
    }
    result
}

fn check_index(index: &LineIndex, content: &[u8], name: &str) {
    let truth = true_offsets(content);
    assert_eq!(index.len(), truth.len(), "Wrong number of lines for {}", name);
    for (i, (line_type, offset)) in truth.iter().enumerate() {
        assert_eq!(index.record(i), Some(LineRecord::new(*line_type, *offset)), "Wrong record {} for {}", i, name);
    }
    assert_eq!(
        index.sentinel(), Some(LineRecord::new(LineIndex::EOF_CODE, content.len() as u64)),
        "Wrong sentinel for {}", name
    );
    assert_eq!(index.file_len(), content.len() as u64, "Wrong file length for {}", name);
    for window in index.records().windows(2) {
        assert!(window[0].offset < window[1].offset, "Offsets are not strictly increasing for {}", name);
    }

    // Type groups are in file order and cover every line exactly once.
    let mut covered = 0;
    for (line_type, count) in index.type_counts() {
        let lines = index.lines_of_type(line_type);
        assert_eq!(lines.len(), count, "Wrong count for type {} in {}", line_type as char, name);
        for window in lines.windows(2) {
            assert!(window[0] < window[1], "Type group {} is not in file order for {}", line_type as char, name);
        }
        for &line in lines {
            assert_eq!(index.record(line).unwrap().line_type, line_type, "Wrong type group for line {} in {}", line, name);
        }
        covered += count;
    }
    assert_eq!(covered, index.len(), "Type groups do not cover all lines for {}", name);
}

//-----------------------------------------------------------------------------

#[test]
fn empty_input() {
    let index = LineIndex::build(&b""[..]).unwrap();
    assert!(index.is_empty());
    assert_eq!(index.records(), &[LineRecord::new(LineIndex::EOF_CODE, 0)]);
    assert!(index.line_range(0).is_err(), "Got a line range from an empty index");
    assert_eq!(index.type_counts().count(), 0);
}

#[test]
fn small_gfa() {
    let content = b"H\tVN:Z:1.0\nS\t1\tACGT\nS\t2\tTTTT\nL\t1\t+\t2\t+\t4M\n";
    let index = LineIndex::build(&content[..]).unwrap();
    check_index(&index, content, "small GFA");
    assert_eq!(index.lines_of_type(LineIndex::HEADER), &[0]);
    assert_eq!(index.lines_of_type(LineIndex::SEGMENT), &[1, 2]);
    assert_eq!(index.lines_of_type(LineIndex::LINK), &[3]);
    assert!(index.lines_of_type(b'P').is_empty());
    assert_eq!(index.line_range(3).unwrap(), 29..content.len() as u64);
}

#[test]
fn unusual_line_breaks() {
    // Empty lines belong to the preceding line and the last line has no newline.
    let content = b"\n\nS\t1\tA\n\n\nL\t1\t+\t1\t-\t0M";
    let index = LineIndex::build(&content[..]).unwrap();
    check_index(&index, content, "unusual line breaks");
    assert_eq!(index.len(), 2);
    assert_eq!(index.line_range(0).unwrap(), 2..10);
    assert_eq!(index.line_range(1).unwrap(), 10..content.len() as u64);
}

#[test]
fn interleaved_types() {
    let content = b"S\ta\tA\nL\ta\t+\tb\t+\t0M\nS\tb\tC\nH\tVN:Z:1.0\nL\tb\t+\ta\t+\t0M\n";
    let index = LineIndex::build(&content[..]).unwrap();
    check_index(&index, content, "interleaved types");
    assert_eq!(index.lines_of_type(LineIndex::SEGMENT), &[0, 2]);
    assert_eq!(index.lines_of_type(LineIndex::LINK), &[1, 4]);
    assert_eq!(index.lines_of_type(LineIndex::HEADER), &[3]);
}

#[test]
fn random_content() {
    for lines in [1, 10, 500] {
        let content = random_gfa(lines);
        let index = LineIndex::build(&content[..]).unwrap();
        check_index(&index, &content, &format!("{} random lines", lines));
    }
}

#[test]
fn out_of_range() {
    let content = b"S\t1\tACGT\n";
    let index = LineIndex::build(&content[..]).unwrap();
    assert_eq!(index.line_range(0).unwrap(), 0..9);
    match index.line_range(1) {
        Err(Error::IndexOutOfRange { index, len }) => {
            assert_eq!(index, 1);
            assert_eq!(len, 1);
        },
        result => panic!("Expected IndexOutOfRange, got {:?}", result),
    }
    assert!(index.record(1).is_none(), "The sentinel is not a line");
}

//-----------------------------------------------------------------------------

#[test]
fn serialized_layout() {
    let content = b"S\t1\tA\n";
    let index = LineIndex::build(&content[..]).unwrap();
    let mut buffer: Vec<u8> = Vec::new();
    index.serialize(&mut buffer).unwrap();
    assert_eq!(buffer.len(), 2 * LineIndex::RECORD_SIZE, "Wrong serialized size");

    let mut truth = vec![b'S'];
    truth.extend_from_slice(&0u64.to_ne_bytes());
    truth.push(LineIndex::EOF_CODE);
    truth.extend_from_slice(&(content.len() as u64).to_ne_bytes());
    assert_eq!(buffer, truth, "Wrong serialized records");
}

#[test]
fn serialize_round_trip() {
    let content = random_gfa(300);
    let index = LineIndex::build(&content[..]).unwrap();
    let mut buffer: Vec<u8> = Vec::new();
    index.serialize(&mut buffer).unwrap();
    let records = buffer.len() / LineIndex::RECORD_SIZE;
    let loaded = LineIndex::deserialize(&mut &buffer[..], records).unwrap();
    assert_eq!(loaded, index, "Index changed in serialization");
}

#[test]
fn file_round_trip() {
    let gfa_file = serialize::temp_file_name("gfa-index");
    let index_file = serialize::temp_file_name("gfa-index");
    let content = random_gfa(200);
    fs::write(&gfa_file, &content).unwrap();

    let index = LineIndex::build_from_file(&gfa_file).unwrap();
    check_index(&index, &content, "file");
    index.save_to(&index_file).unwrap();
    assert_eq!(
        fs::metadata(&index_file).unwrap().len() as usize,
        (index.len() + 1) * LineIndex::RECORD_SIZE,
        "Wrong index file size"
    );

    let loaded = LineIndex::load_from(&index_file).unwrap();
    assert_eq!(loaded, index, "Index changed in a file round trip");

    let _ = fs::remove_file(&gfa_file);
    let _ = fs::remove_file(&index_file);
}

#[test]
fn trailing_bytes_are_ignored() {
    let index_file = serialize::temp_file_name("gfa-index");
    let content = b"H\tVN:Z:1.0\nS\t1\tACGT\n";
    let index = LineIndex::build(&content[..]).unwrap();
    let mut buffer: Vec<u8> = Vec::new();
    index.serialize(&mut buffer).unwrap();
    buffer.extend_from_slice(b"abc");
    fs::write(&index_file, &buffer).unwrap();

    let loaded = LineIndex::load_from(&index_file).unwrap();
    assert_eq!(loaded, index, "Trailing bytes changed the index");

    let _ = fs::remove_file(&index_file);
}

// Serializes the given records as they would appear in a companion file.
fn serialized_records(records: &[(u8, u64)]) -> Vec<u8> {
    let mut buffer: Vec<u8> = Vec::new();
    for &(line_type, offset) in records.iter() {
        buffer.write_u8(line_type).unwrap();
        buffer.write_u64::<NativeEndian>(offset).unwrap();
    }
    buffer
}

#[test]
fn corrupt_line_ranges() {
    // Line 0 is decreasing, line 1 is valid, line 2 ends past the sentinel, and line 3 is decreasing.
    let buffer = serialized_records(&[(b'S', 9), (b'S', 0), (b'L', 12), (b'S', 20), (b'X', 15)]);
    let index = LineIndex::deserialize(&mut &buffer[..], 5).unwrap();
    assert_eq!(index.len(), 4);
    assert_eq!(index.line_range(1).unwrap(), 0..12, "Wrong range for a valid line");

    for (line, start, end) in [(0, 9, 0), (2, 12, 20), (3, 20, 15)] {
        match index.line_range(line) {
            Err(Error::InvalidLineRange { index: i, start: s, end: e }) => {
                assert_eq!(i, line);
                assert_eq!((s, e), (start, end), "Wrong range in the error for line {}", line);
            },
            result => panic!("Expected InvalidLineRange for line {}, got {:?}", line, result),
        }
    }
}

#[test]
fn missing_files() {
    let filename = serialize::temp_file_name("gfa-index");
    assert!(matches!(LineIndex::build_from_file(&filename), Err(Error::FileNotFound { .. })));
    assert!(matches!(LineIndex::load_from(&filename), Err(Error::FileNotFound { .. })));
}

//-----------------------------------------------------------------------------
