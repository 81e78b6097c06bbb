//! Tests for DOM tree mutation methods: remove_child, insert_before, move_children.

use heron_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::html(tag)))
}

/// Helper to build `<div>` under the root with children `a`, `b`, `c`.
fn div_with_three(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let parent = alloc_element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = alloc_element(tree, "a");
    let b = alloc_element(tree, "b");
    let c = alloc_element(tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);
    (parent, a, b, c)
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    tree.remove_child(parent, child);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_wrong_parent_is_noop() {
    let mut tree = DomTree::new();
    let (parent, a, _, _) = div_with_three(&mut tree);
    let other = alloc_element(&mut tree, "span");

    tree.remove_child(other, a);

    assert_eq!(tree.parent(a), Some(parent));
    assert_eq!(tree.children(parent).len(), 3);
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let existing = alloc_element(&mut tree, "b");
    tree.append_child(parent, existing);

    let new_child = alloc_element(&mut tree, "a");
    tree.insert_before(parent, new_child, existing);

    assert_eq!(tree.children(parent), &[new_child, existing]);
    assert_eq!(tree.parent(new_child), Some(parent));
    assert_eq!(tree.next_sibling(new_child), Some(existing));
    assert_eq!(tree.prev_sibling(new_child), None);
    assert_eq!(tree.prev_sibling(existing), Some(new_child));
}

#[test]
fn test_insert_before_moves_attached_node() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);

    // c already lives in parent; inserting it before a moves it
    tree.insert_before(parent, c, a);

    assert_eq!(tree.children(parent), &[c, a, b]);
    assert_eq!(tree.next_sibling(b), None);
}

#[test]
fn test_append_child_reparents() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);
    let other = alloc_element(&mut tree, "section");
    tree.append_child(NodeId::ROOT, other);

    tree.append_child(other, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.children(other), &[b]);
    assert_eq!(tree.parent(b), Some(other));
}

// ========== move_children ==========

#[test]
fn test_move_children_appends_to_existing() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    let existing = alloc_element(&mut tree, "x");
    tree.append_child(to, existing);

    let moved = alloc_element(&mut tree, "y");
    tree.append_child(from, moved);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, moved]);
    assert_eq!(tree.parent(moved), Some(to));
    assert_eq!(tree.next_sibling(existing), Some(moved));
    assert_eq!(tree.prev_sibling(moved), Some(existing));
}

#[test]
fn test_move_children_empty_source() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert!(tree.children(to).is_empty());
}

// ========== traversal ==========

#[test]
fn test_descendants_in_tree_order() {
    let mut tree = DomTree::new();
    let (parent, a, b, c) = div_with_three(&mut tree);
    let inner = alloc_element(&mut tree, "i");
    tree.append_child(a, inner);

    let order: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(order, vec![parent, a, inner, b, c]);
}

#[test]
fn test_text_content_concatenates_text_descendants() {
    let mut tree = DomTree::new();
    let (_, a, _, c) = div_with_three(&mut tree);
    let hello = tree.alloc(NodeType::Text("hello ".to_string()));
    let comment = tree.alloc(NodeType::Comment("skipped".to_string()));
    let world = tree.alloc(NodeType::Text("world".to_string()));
    tree.append_child(a, hello);
    tree.append_child(a, comment);
    tree.append_child(c, world);

    assert_eq!(tree.text_content(NodeId::ROOT), "hello world");
}

#[test]
fn test_get_element_by_id_and_tag_name() {
    let mut tree = DomTree::new();
    let (_, a, b, _) = div_with_three(&mut tree);
    if let Some(data) = tree.as_element_mut(b) {
        data.attrs.set("id", "target");
    }
    let nested = alloc_element(&mut tree, "b");
    tree.append_child(a, nested);

    assert_eq!(tree.get_element_by_id("target"), Some(b));
    assert_eq!(tree.get_elements_by_tag_name("b"), vec![nested, b]);
}

#[test]
fn test_document_element_skips_non_elements() {
    let mut tree = DomTree::new();
    let comment = tree.alloc(NodeType::Comment("lead".to_string()));
    tree.append_child(NodeId::ROOT, comment);
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);

    assert_eq!(tree.document_element(), Some(html));
}
