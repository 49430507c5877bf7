//! Property-based tests for the reassembly engine.
//!
//! - Any delivery order with duplicates rebuilds the exact file
//! - Progress never goes backwards within a session
//! - Rejected blocks never touch the buffer or the missing set
//! - Arbitrary payloads never panic the receiver

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::block::Block;
use crate::metadata::TransferMetadata;
use crate::reassembly::apply_block;
use crate::receiver::{Event, Receiver};
use crate::session::Session;

/// Broadcaster side, for tests only: metadata payload plus one payload per data block.
fn broadcast(name: &str, data: &[u8], block_size: usize) -> (Vec<u8>, Vec<Vec<u8>>) {
    let blocks: Vec<Vec<u8>> = data
        .chunks(block_size)
        .enumerate()
        .map(|(i, chunk)| {
            Block::new(i as u32 + 1, (i * block_size) as u32, chunk.to_vec()).encode()
        })
        .collect();
    let meta = TransferMetadata {
        file_name: name.into(),
        file_length: data.len() as u64,
        block_size: block_size as u32,
        last_block_index: blocks.len() as u32,
    };
    (Block::new(0, 0, meta.to_payload()).encode(), blocks)
}

prop_compose! {
    fn arb_file()(
        data in proptest::collection::vec(any::<u8>(), 0..600),
        block_size in 1usize..80,
    ) -> (Vec<u8>, usize) {
        (data, block_size)
    }
}

proptest! {
    #[test]
    fn any_order_with_duplicates_rebuilds_file(
        (data, block_size) in arb_file(),
        seed in any::<u64>(),
        repeats in proptest::collection::vec(any::<prop::sample::Index>(), 0..30),
    ) {
        let (meta, blocks) = broadcast("p.bin", &data, block_size);
        let mut order = blocks.clone();
        if !blocks.is_empty() {
            for r in &repeats {
                order.push(blocks[r.index(blocks.len())].clone());
            }
        }
        order.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut rx = Receiver::default();
        rx.on_payload(&meta).unwrap();
        let mut completions = 0;
        let mut last_ratio = rx.progress().unwrap().ratio;
        for raw in &order {
            let events = rx.on_payload(raw).unwrap();
            completions += events.iter().filter(|e| matches!(e, Event::Complete { .. })).count();
            let ratio = rx.progress().unwrap().ratio;
            prop_assert!(ratio >= last_ratio);
            last_ratio = ratio;
        }
        prop_assert!(rx.is_complete());
        prop_assert_eq!(completions, if blocks.is_empty() { 0 } else { 1 });
        prop_assert_eq!(rx.session().unwrap().buffer(), &data[..]);
    }

    #[test]
    fn applying_twice_equals_applying_once(
        (data, block_size) in arb_file(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!data.is_empty());
        let (meta, blocks) = broadcast("p.bin", &data, block_size);
        let raw = &blocks[pick.index(blocks.len())];

        let mut once = Receiver::default();
        once.on_payload(&meta).unwrap();
        once.on_payload(raw).unwrap();

        let mut twice = Receiver::default();
        twice.on_payload(&meta).unwrap();
        twice.on_payload(raw).unwrap();
        twice.on_payload(raw).unwrap();

        let (a, b) = (once.session().unwrap(), twice.session().unwrap());
        prop_assert_eq!(a.missing(), b.missing());
        prop_assert_eq!(a.buffer(), b.buffer());
    }

    #[test]
    fn rejected_blocks_do_not_mutate(
        file_length in 0u64..256,
        last in 0u32..8,
        index in any::<u32>(),
        offset in any::<u32>(),
        payload in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let meta = TransferMetadata {
            file_name: "r".into(),
            file_length,
            block_size: 32,
            last_block_index: last,
        };
        let mut s = Session::open(meta, file_length as usize, 0);
        let block = Block::new(index, offset, payload);
        let fits = index >= 1 && index <= last && block.end() <= file_length;
        let missing = s.missing().clone();
        match apply_block(&mut s, &block) {
            Ok(_) => prop_assert!(fits),
            Err(e) => {
                prop_assert!(!fits);
                prop_assert!(e.is_out_of_bounds());
                prop_assert_eq!(s.missing(), &missing);
                prop_assert!(s.buffer().iter().all(|&b| b == 0));
            }
        }
    }

    #[test]
    fn arbitrary_payloads_never_panic(
        payloads in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..48), 0..40),
    ) {
        let mut rx = Receiver::default();
        for raw in &payloads {
            let _ = rx.on_payload(raw);
        }
    }
}
