use anyhow::Result;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use membuf::{BLOCK_SIZE, BufferError, PagedBuffer, SeekOrigin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Seek, SeekFrom, Write};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Record {
    id: u32,
    name: String,
    payload: Vec<u8>,
}

#[test]
fn test_copy_from_file() -> Result<()> {
    let mut file = tempfile::tempfile()?;
    let data: Vec<u8> = (0..BLOCK_SIZE * 3 + 17).map(|i| (i * 7 % 256) as u8).collect();
    file.write_all(&data)?;
    file.rewind()?;

    let mut buffer = PagedBuffer::new();
    let copied = io::copy(&mut file, &mut buffer)?;
    assert_eq!(copied as usize, data.len());
    assert_eq!(buffer.block_count(), 4);
    assert_eq!(buffer.len(), data.len());

    buffer.rewind()?;
    let mut out = Vec::new();
    buffer.read_to_end(&mut out)?;
    assert_eq!(out, data);

    Ok(())
}

#[test]
fn test_copy_into_file() -> Result<()> {
    let mut buffer = PagedBuffer::new();
    for i in 0..1000u32 {
        writeln!(buffer, "line {}", i)?;
    }
    buffer.rewind()?;

    let mut file = tempfile::tempfile()?;
    io::copy(&mut buffer, &mut file)?;
    file.rewind()?;

    let mut text = String::new();
    file.read_to_string(&mut text)?;
    assert_eq!(text.lines().count(), 1000);
    assert_eq!(text.lines().last(), Some("line 999"));

    Ok(())
}

#[test]
fn test_byteorder_fields() -> Result<()> {
    let mut buffer = PagedBuffer::new();
    buffer.write_u32::<LittleEndian>(0xdead_beef)?;
    buffer.write_u16::<BigEndian>(0x0102)?;
    buffer.write_i64::<LittleEndian>(-42)?;
    assert_eq!(buffer.len(), 14);

    // patch the first field in place
    buffer.seek(SeekFrom::Start(0))?;
    buffer.write_u32::<LittleEndian>(7)?;
    assert_eq!(buffer.len(), 14);

    buffer.rewind()?;
    assert_eq!(buffer.read_u32::<LittleEndian>()?, 7);
    assert_eq!(buffer.read_u16::<BigEndian>()?, 0x0102);
    assert_eq!(buffer.read_i64::<LittleEndian>()?, -42);

    let err = buffer.read_u8().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

    Ok(())
}

#[test]
fn test_fields_straddling_block_boundary() -> Result<()> {
    let mut buffer = PagedBuffer::new();
    buffer.write_all(&vec![0u8; BLOCK_SIZE - 3])?;
    buffer.write_u64::<BigEndian>(0x0102_0304_0506_0708)?;
    assert_eq!(buffer.block_count(), 2);

    buffer.seek(SeekFrom::End(-8))?;
    assert_eq!(buffer.read_u64::<BigEndian>()?, 0x0102_0304_0506_0708);

    Ok(())
}

#[test]
fn test_bincode_records() -> Result<()> {
    let records: Vec<Record> = (0..50)
        .map(|i| Record {
            id: i,
            name: format!("record-{}", i),
            payload: vec![i as u8; (i as usize) * 1000],
        })
        .collect();

    let mut buffer = PagedBuffer::new();
    for record in &records {
        bincode::serialize_into(&mut buffer, record)?;
    }
    assert!(buffer.block_count() > 1);

    buffer.rewind()?;
    for expected in &records {
        let record: Record = bincode::deserialize_from(&mut buffer)?;
        assert_eq!(&record, expected);
    }
    assert_eq!(buffer.position(), buffer.len());

    Ok(())
}

#[test]
fn test_seek_past_end_is_rejected() -> Result<()> {
    let mut buffer = PagedBuffer::new();
    buffer.write_all(b"Hello, World!")?;

    assert!(matches!(
        buffer.seek_to(14, SeekOrigin::Start),
        Err(BufferError::OutOfRange { .. })
    ));
    let err = buffer.seek(SeekFrom::Current(1)).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

    assert_eq!(buffer.seek_to(13, SeekOrigin::Start)?, 13);
    Ok(())
}

#[test]
fn test_random_operations_match_model() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0x6d65_6d62_7566);
    let mut buffer = PagedBuffer::new();
    let mut model: Vec<u8> = Vec::new();
    let mut cursor = 0usize;

    for _ in 0..500 {
        match rng.gen_range(0..3) {
            0 => {
                let len = rng.gen_range(0..BLOCK_SIZE / 2);
                let data: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
                assert_eq!(buffer.write_chunk(&data), len);

                let end = cursor + len;
                if end > model.len() {
                    model.resize(end, 0);
                }
                model[cursor..end].copy_from_slice(&data);
                cursor = end;
            }
            1 => {
                let len = rng.gen_range(0..BLOCK_SIZE);
                let mut dst = vec![0u8; len];
                let outcome = buffer.read_chunk(&mut dst);

                let expected = len.min(model.len() - cursor);
                assert_eq!(outcome.count, expected);
                assert_eq!(&dst[..expected], &model[cursor..cursor + expected]);
                cursor += expected;
                assert_eq!(outcome.end_of_data, cursor == model.len());
            }
            _ => {
                let target = rng.gen_range(0..=model.len() + 2);
                let length_before = buffer.len();
                let result = buffer.seek_to(target as i64, SeekOrigin::Start);
                if target <= model.len() {
                    assert_eq!(result?, target as u64);
                    cursor = target;
                } else {
                    assert!(result.is_err());
                }
                assert_eq!(buffer.len(), length_before);
            }
        }

        assert_eq!(buffer.position(), cursor);
        assert_eq!(buffer.len(), model.len());
        assert!(buffer.len() <= buffer.capacity());
        assert_eq!(buffer.block_count(), model.len().div_ceil(BLOCK_SIZE));
    }

    assert_eq!(buffer.to_bytes().as_ref(), model.as_slice());
    Ok(())
}
