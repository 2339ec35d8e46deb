//! Batch files written to disk and read back.

use std::fs;

use batch::{BATCH_MAGIC, BatchError, BatchFile};
use matching::compute_delta;
use signature::{ChunkSize, build_index};
use tempfile::tempdir;

fn size(len: u32) -> ChunkSize {
    ChunkSize::try_from(len).expect("chunk size")
}

#[test]
fn saved_batch_loads_identically() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("update.batch");

    let reference: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let mut source = reference.clone();
    source.splice(100..100, b"inserted".iter().copied());

    let index = build_index(&reference[..], size(64)).expect("index");
    let response = compute_delta(index.clone(), &source[..]).expect("delta");
    let batch = BatchFile::from_index(&index, response);

    batch.save(&path).expect("save");
    let bytes = fs::read(&path).expect("read");
    assert_eq!(&bytes[..8], &BATCH_MAGIC);

    let loaded = BatchFile::load(&path).expect("load");
    assert_eq!(loaded, batch);
    assert_eq!(loaded.chunk_size(), size(64));
}

#[test]
fn missing_batch_reports_path() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("absent.batch");

    let err = BatchFile::load(&path).expect_err("missing file");
    assert!(matches!(err, BatchError::File { action: "open", .. }));
    assert!(err.to_string().contains("absent.batch"));
}

#[test]
fn truncated_batch_is_rejected() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("cut.batch");

    let index = build_index(&[7u8; 32][..], size(8)).expect("index");
    let response = compute_delta(index.clone(), &[7u8; 32][..]).expect("delta");
    BatchFile::from_index(&index, response)
        .save(&path)
        .expect("save");

    let bytes = fs::read(&path).expect("read");
    fs::write(&path, &bytes[..bytes.len() - 3]).expect("truncate");
    assert!(matches!(BatchFile::load(&path), Err(BatchError::Io(_))));
}
