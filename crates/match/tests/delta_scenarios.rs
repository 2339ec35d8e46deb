//! End-to-end delta scans over realistic edits.
//!
//! Each scenario builds an index over a reference, scans a modified source,
//! and replays the response against the reference to confirm the source is
//! reproduced exactly.

use checksums::RollingChecksum;
use matching::{BlockType, DeltaMatcher, Response, compute_delta};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use signature::{ChunkIndex, ChunkSize, DEFAULT_CHUNK_SIZE, build_index};

fn size(len: u64) -> ChunkSize {
    ChunkSize::new(len).expect("chunk size")
}

fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}

fn replay(response: &Response, index: &ChunkIndex, reference: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for packet in response {
        match packet.block_type() {
            BlockType::Literal => out.extend_from_slice(packet.data()),
            BlockType::Reference => {
                let chunk_index = packet.chunk_index().expect("8-byte payload");
                let chunk = index.chunk(chunk_index).expect("known chunk");
                let start = chunk.offset() as usize;
                out.extend_from_slice(&reference[start..start + chunk.size() as usize]);
            }
        }
    }
    out
}

fn delta(reference: &[u8], source: &[u8], chunk: ChunkSize) -> (Response, ChunkIndex) {
    let index = build_index(reference, chunk).expect("index");
    let response = compute_delta(index.clone(), source).expect("scan");
    (response, index)
}

#[test]
fn reordered_chunks_are_all_references() {
    let chunk = DEFAULT_CHUNK_SIZE as usize;
    let reference = random_bytes(1, chunk * 5);
    let piece = |i: usize| &reference[i * chunk..(i + 1) * chunk];
    let source = [piece(2), piece(0), piece(4), piece(1), piece(3)].concat();

    let (response, index) = delta(&reference, &source, ChunkSize::DEFAULT);

    let indices: Vec<_> = response.iter().map(|p| p.chunk_index()).collect();
    assert_eq!(indices, vec![Some(2), Some(0), Some(4), Some(1), Some(3)]);
    assert_eq!(replay(&response, &index, &reference), source);
}

#[test]
fn byte_equal_chunks_are_consumed_in_insertion_order() {
    let chunk = 64;
    let block = random_bytes(4, chunk);
    let reference = block.repeat(5);

    let (response, index) = delta(&reference, &reference, size(chunk as u64));

    let indices: Vec<_> = response.iter().map(|p| p.chunk_index()).collect();
    assert_eq!(indices, vec![Some(0), Some(1), Some(2), Some(3), Some(4)]);
    assert_eq!(response.literal_bytes(), 0);
    assert_eq!(replay(&response, &index, &reference), reference);
}

#[test]
fn prefix_insertion_is_one_literal_then_references() {
    let chunk = DEFAULT_CHUNK_SIZE as usize;
    let reference = random_bytes(2, chunk * 3);
    let inserted = random_bytes(3, 100);
    let source = [inserted.as_slice(), reference.as_slice()].concat();

    let (response, index) = delta(&reference, &source, ChunkSize::DEFAULT);

    let packets = response.packets();
    assert_eq!(packets.len(), 4);
    assert_eq!(packets[0].block_type(), BlockType::Literal);
    assert_eq!(packets[0].data(), inserted.as_slice());
    let indices: Vec<_> = packets[1..].iter().map(|p| p.chunk_index()).collect();
    assert_eq!(indices, vec![Some(0), Some(1), Some(2)]);
    assert_eq!(replay(&response, &index, &reference), source);
}

#[test]
fn weak_collision_falls_back_to_literal() {
    let prefix = [9u8, 8, 7, 6, 5, 4];
    let suffix = [3u8, 2, 1, 0, 11, 12];
    let reference = [&prefix[..], &[1, 0, 0, 1], &suffix[..]].concat();
    let source = [&prefix[..], &[0, 1, 1, 0], &suffix[..]].concat();
    assert_eq!(
        RollingChecksum::from_bytes(&reference).value(),
        RollingChecksum::from_bytes(&source).value()
    );

    let index = build_index(&reference[..], size(16)).expect("index");
    let mut matcher = DeltaMatcher::new(index, &source[..]);
    let response = matcher.run().expect("scan");

    assert_eq!(response.reference_count(), 0);
    assert_eq!(response.literal_bytes(), 16);
    assert_eq!(matcher.stats().integrity_warnings, 1);
    assert_eq!(matcher.index().remaining_candidates(), 1);
}

#[test]
fn duplicated_source_chunk_reuses_reference_once() {
    let chunk = 64;
    let reference = random_bytes(4, chunk * 2);
    let source = [&reference[..chunk], &reference[..chunk], &reference[chunk..]].concat();

    let (response, index) = delta(&reference, &source, size(chunk as u64));

    let references: Vec<_> = response.iter().filter_map(|p| p.chunk_index()).collect();
    assert_eq!(references, vec![0, 1]);
    assert_eq!(response.literal_bytes(), chunk as u64);
    assert_eq!(replay(&response, &index, &reference), source);
}

#[test]
fn short_source_against_empty_reference() {
    let (response, _) = delta(&[], b"tiny", ChunkSize::DEFAULT);
    assert_eq!(response.len(), 1);
    assert_eq!(response.packets()[0].data(), b"tiny");
}

proptest! {
    #[test]
    fn responses_replay_to_the_source(
        reference in prop::collection::vec(any::<u8>(), 0..2048),
        prefix in prop::collection::vec(any::<u8>(), 0..200),
        suffix in prop::collection::vec(any::<u8>(), 0..200),
        cut in 0usize..2048,
        chunk in 1u64..=64,
    ) {
        let cut = cut.min(reference.len());
        let source = [&prefix[..], &reference[cut..], &suffix[..]].concat();
        let (response, index) = delta(&reference, &source, size(chunk));

        prop_assert_eq!(replay(&response, &index, &reference), source.clone());
        prop_assert_eq!(response.target_len(chunk), source.len() as u64);
        for packet in &response {
            prop_assert!(packet.data().len() as u64 <= chunk.max(8));
            if packet.block_type() == BlockType::Literal {
                prop_assert!(!packet.data().is_empty());
            }
        }
    }

    #[test]
    fn each_chunk_is_referenced_at_most_once(
        reference in prop::collection::vec(0u8..4, 0..512),
        repeats in 1usize..4,
        chunk in 1u64..=16,
    ) {
        let source = reference.repeat(repeats);
        let (response, _) = delta(&reference, &source, size(chunk));

        let mut seen: Vec<_> = response.iter().filter_map(|p| p.chunk_index()).collect();
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), total);
    }
}
