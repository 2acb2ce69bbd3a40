use avl_map::{AvlError, AvlMap};

fn collect_keys<V>(map: &AvlMap<i32, V>) -> Vec<i32> {
    map.keys().copied().collect()
}

#[test]
fn insert_get_overwrite() {
    let mut map = AvlMap::<i32, i32>::new();
    map.insert(1, 1);
    map.insert(3, 5);
    map.insert(4, 5);
    map.insert(3, 15);
    map.insert(44, 123);

    assert_eq!(map.size(), 4);
    assert_eq!(map.get(&44), Some(&123));
    assert_eq!(map.get(&3), Some(&15));
    assert_eq!(collect_keys(&map), vec![1, 3, 4, 44]);
    map.assert_valid().unwrap();
}

#[test]
fn stable_indices() {
    let mut map = AvlMap::<i32, i32>::new();
    let i10 = map.insert(10, 100);
    let i5 = map.insert(5, 50);
    let i20 = map.insert(20, 200);

    assert_eq!(map.find(&5), Some(i5));
    assert_eq!(map.find(&20), Some(i20));
    // Overwrite reuses the existing slot.
    assert_eq!(map.insert(10, 101), i10);
    assert_eq!(map.value(i10), &101);
}

#[test]
fn iteration() {
    let mut map = AvlMap::<String, i32>::new();
    assert_eq!(map.first(), None);

    map.insert("b".to_string(), 2);
    map.insert("a".to_string(), 1);
    map.insert("c".to_string(), 3);

    let mut list = Vec::new();
    let mut entry = map.first();
    while let Some(i) = entry {
        list.push((map.key(i).clone(), *map.value(i)));
        entry = map.next(i);
    }
    assert_eq!(
        list,
        vec![
            ("a".to_string(), 1),
            ("b".to_string(), 2),
            ("c".to_string(), 3)
        ]
    );

    let pairs: Vec<(String, i32)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    assert_eq!(list, pairs);

    // Restartable: a second pass starts over from the smallest key.
    let once: Vec<String> = map.keys().cloned().collect();
    let twice: Vec<String> = map.keys().cloned().collect();
    assert_eq!(once, twice);
}

#[test]
fn misc_api() {
    let mut map = AvlMap::<i32, i32>::new();
    assert!(map.is_empty());
    assert_eq!(map.size(), 0);
    assert_eq!(map.height(), 0);

    map.insert(10, 100);
    map.insert(5, 50);
    map.insert(20, 200);
    assert!(!map.is_empty());
    assert!(map.contains(&10));
    assert!(!map.contains(&11));

    *map.get_mut(&10).unwrap() = 101;
    assert_eq!(map.get(&10), Some(&101));

    map.delete(&10).unwrap();
    assert_eq!(map.delete(&10), Err(AvlError::KeyNotFound));
    assert_eq!(map.size(), 2);

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.first(), None);
    map.assert_valid().unwrap();
}

#[test]
fn empty_map_behavior() {
    let mut map = AvlMap::<i32, i32>::new();
    assert_eq!(map.delete(&3), Err(AvlError::KeyNotFound));
    assert_eq!(map.get(&3), None);
    assert_eq!(map.size(), 0);
    map.assert_valid().unwrap();
}

#[test]
fn delete_missing_leaves_map_unchanged() {
    let mut map = AvlMap::<i32, i32>::new();
    for i in 0..10 {
        map.insert(i, i);
    }
    let before = collect_keys(&map);
    assert_eq!(map.delete(&42), Err(AvlError::KeyNotFound));
    assert_eq!(map.size(), 10);
    assert_eq!(collect_keys(&map), before);
    map.assert_valid().unwrap();
}

#[test]
fn delete_structural_cases() {
    let mut map = AvlMap::<i32, i32>::new();
    for i in 0..10 {
        map.insert(i, i);
    }

    // Leaf.
    map.delete(&0).unwrap();
    assert_eq!(collect_keys(&map), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    map.assert_valid().unwrap();

    // One child.
    map.delete(&8).unwrap();
    assert_eq!(collect_keys(&map), vec![1, 2, 3, 4, 5, 6, 7, 9]);
    map.assert_valid().unwrap();

    // Two children.
    map.delete(&2).unwrap();
    assert_eq!(collect_keys(&map), vec![1, 3, 4, 5, 6, 7, 9]);
    map.assert_valid().unwrap();
}

#[test]
fn delete_root_with_both_children() {
    let mut map = AvlMap::<i32, i32>::new();
    map.insert(3, 3);
    map.insert(4, 4);
    map.insert(2, 2);
    map.delete(&3).unwrap();

    let root = map.root().unwrap();
    assert_eq!(map.key(root), &4);
    assert_eq!(map.value(root), &4);
    assert_eq!(map.left(root).map(|i| *map.key(i)), Some(2));
    assert_eq!(map.right(root), None);
    map.assert_valid().unwrap();
}

#[test]
fn delete_root_with_left_child() {
    let mut map = AvlMap::<i32, i32>::new();
    map.insert(3, 3);
    map.insert(2, 2);
    map.delete(&3).unwrap();

    assert_eq!(map.size(), 1);
    let root = map.root().unwrap();
    assert_eq!(map.key(root), &2);
    assert_eq!(map.parent(root), None);
    assert_eq!(map.left(root), None);
    assert_eq!(map.right(root), None);
    map.assert_valid().unwrap();
}

#[test]
fn delete_root_with_right_child() {
    let mut map = AvlMap::<i32, i32>::new();
    map.insert(3, 3);
    map.insert(4, 4);
    map.delete(&3).unwrap();

    assert_eq!(map.size(), 1);
    let root = map.root().unwrap();
    assert_eq!(map.key(root), &4);
    assert_eq!(map.left(root), None);
    assert_eq!(map.right(root), None);
    map.assert_valid().unwrap();
}

#[test]
fn delete_root_of_branching_tree() {
    let mut map = AvlMap::<i32, i32>::new();
    for i in 0..10 {
        map.insert(i, i);
    }
    let old_root_key = *map.key(map.root().unwrap());
    map.delete(&old_root_key).unwrap();

    let root = map.root().unwrap();
    assert_ne!(map.key(root), &old_root_key);
    assert!(map.left(root).is_some());
    assert!(map.right(root).is_some());
    map.assert_valid().unwrap();
}

#[test]
fn delete_sole_entry() {
    let mut map = AvlMap::<i32, i32>::new();
    map.insert(1, 1);
    map.delete(&1).unwrap();
    assert!(map.is_empty());
    assert_eq!(map.root(), None);
    map.assert_valid().unwrap();
}

#[test]
fn reinsert_after_delete() {
    let mut map = AvlMap::<i32, i32>::new();
    for i in 0..10 {
        map.insert(i, i);
    }
    map.delete(&1).unwrap();
    assert_eq!(map.get(&1), None);
    map.insert(1, 1);
    assert_eq!(map.get(&1), Some(&1));
    assert_eq!(map.size(), 10);
    map.assert_valid().unwrap();
}

#[test]
fn custom_comparator_reverse_order() {
    let mut map = AvlMap::<i32, i32, _>::with_comparator(|a: &i32, b: &i32| b - a);
    for i in 0..10 {
        map.insert(i, i);
    }
    let keys: Vec<i32> = map.keys().copied().collect();
    assert_eq!(keys, (0..10).rev().collect::<Vec<i32>>());
    map.delete(&9).unwrap();
    assert_eq!(map.first().map(|i| *map.key(i)), Some(8));
    map.assert_valid().unwrap();
}
