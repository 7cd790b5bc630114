//! Tests for sequences of draft edits
//!
//! This tests:
//! - Append-only block creation
//! - Move boundaries and move/move-back symmetry
//! - Removal and selection interplay
//! - Grouping over interleaved groups
//! - Dirty flag transitions

use sproux_editor::{BlockType, ContentBlock, Direction, MetadataPatch, PageBlockStore, PageData};

fn page(blocks: &[(&str, Option<&str>)]) -> PageData {
    PageData::new("home", "Home", "/").with_blocks(
        blocks
            .iter()
            .map(|(id, group)| {
                let block = ContentBlock::new(*id, BlockType::Text, *id, *id);
                match group {
                    Some(g) => block.with_group(*g),
                    None => block,
                }
            })
            .collect(),
    )
}

fn ids(store: &PageBlockStore) -> Vec<String> {
    store.blocks().iter().map(|b| b.id.to_string()).collect()
}

#[test]
fn test_add_never_reorders_existing_blocks() {
    let mut store = PageBlockStore::open(&page(&[("a", None), ("b", None), ("c", None)]));

    for (n, block_type) in BlockType::ALL.into_iter().enumerate() {
        let before = ids(&store);
        let id = store.add_block(block_type).unwrap();
        let after = ids(&store);

        assert_eq!(after.len(), 3 + n + 1);
        assert_eq!(&after[..before.len()], before.as_slice());
        assert_eq!(after.last().unwrap(), id.as_str());
        assert_eq!(store.block(id.as_str()).unwrap().block_type(), block_type);
    }
}

#[test]
fn test_added_ids_are_unique() {
    let mut store = PageBlockStore::open(&page(&[]));
    for _ in 0..50 {
        store.add_block(BlockType::Text);
    }
    let mut all = ids(&store);
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 50);
}

#[test]
fn test_boundary_moves_leave_order_unchanged() {
    let mut store = PageBlockStore::open(&page(&[("first", None), ("mid", None), ("last", None)]));
    let before = ids(&store);

    store.move_block("first", Direction::Up);
    store.move_block("last", Direction::Down);

    assert_eq!(ids(&store), before);
}

#[test]
fn test_move_up_then_down_restores_order() {
    let start: [(&str, Option<&str>); 4] = [("a", None), ("b", None), ("c", None), ("d", None)];
    for (id, _) in &start[1..] {
        let mut store = PageBlockStore::open(&page(&start));
        let before = ids(&store);

        assert!(store.move_block(id, Direction::Up));
        assert_ne!(ids(&store), before);
        assert!(store.move_block(id, Direction::Down));
        assert_eq!(ids(&store), before);
    }
}

#[test]
fn test_removing_other_block_keeps_selection() {
    let mut store = PageBlockStore::open(&page(&[("a", None), ("b", None), ("c", None)]));
    store.select("b");

    store.remove_block("a");
    assert_eq!(store.selected_id().unwrap(), "b");

    store.request_removal("b");
    store.confirm_removal();
    assert!(store.selected_id().is_none());
    assert_eq!(ids(&store), vec!["c"]);
}

#[test]
fn test_grouping_covers_every_block_once() {
    let store = PageBlockStore::open(&page(&[
        ("hero-title", Some("Hero")),
        ("intro", None),
        ("hero-image", Some("Hero")),
        ("plan-a", Some("Plans")),
        ("outro", None),
    ]));
    let groups = store.group_blocks();

    assert_eq!(groups.block_count(), store.blocks().len());
    let mut seen: Vec<_> = groups.flatten().into_iter().map(|b| b.id.to_string()).collect();
    seen.sort();
    let mut expected = ids(&store);
    expected.sort();
    assert_eq!(seen, expected);

    // each bucket is the page order filtered to that group
    for (name, bucket) in groups.iter() {
        let filtered: Vec<_> = store.blocks().iter().filter(|b| b.group() == name).collect();
        assert_eq!(bucket, filtered.as_slice());
    }
}

#[test]
fn test_interleaved_groups_do_not_flatten_to_page_order() {
    let store = PageBlockStore::open(&page(&[
        ("block0", Some("A")),
        ("block1", Some("B")),
        ("block2", Some("A")),
    ]));
    let groups = store.group_blocks();

    let a: Vec<_> = groups.get("A").unwrap().iter().map(|b| b.id.as_str()).collect();
    let b: Vec<_> = groups.get("B").unwrap().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(a, vec!["block0", "block2"]);
    assert_eq!(b, vec!["block1"]);
    assert_eq!(groups.names().collect::<Vec<_>>(), vec!["A", "B"]);

    let flattened: Vec<_> = groups.flatten().into_iter().map(|b| b.id.as_str()).collect();
    assert_eq!(flattened, vec!["block0", "block2", "block1"]);
    assert_ne!(flattened, vec!["block0", "block1", "block2"]);
}

#[test]
fn test_regrouping_a_block_moves_it_between_buckets() {
    let mut store = PageBlockStore::open(&page(&[("a", Some("X")), ("b", Some("X"))]));
    store.update_block_value("b", "b", Some(MetadataPatch::new().group("Y")), None);

    let groups = store.group_blocks();
    assert_eq!(groups.get("X").unwrap().len(), 1);
    assert_eq!(groups.get("Y").unwrap()[0].id, "b");
    // page order is unaffected by grouping
    assert_eq!(ids(&store), vec!["a", "b"]);
}

#[test]
fn test_dirty_flag_transitions() {
    let fresh = || PageBlockStore::open(&page(&[("a", None), ("b", None)]));

    let mut store = fresh();
    assert!(!store.is_dirty());
    store.update_block_value("nope", "x", None, None);
    assert!(!store.is_dirty());
    store.move_block("a", Direction::Up);
    assert!(!store.is_dirty());
    store.remove_block("nope");
    assert!(!store.is_dirty());

    let mut store = fresh();
    store.add_block(BlockType::Faq);
    assert!(store.is_dirty());

    let mut store = fresh();
    store.update_block_value("a", "x", None, None);
    assert!(store.is_dirty());

    let mut store = fresh();
    store.move_block("a", Direction::Down);
    assert!(store.is_dirty());

    let mut store = fresh();
    store.remove_block("b");
    assert!(store.is_dirty());
}
