use pretty_assertions::assert_eq;

use super::*;

#[test]
fn global_scope_is_root() {
    let tree = ScopeTree::new();
    assert_eq!(tree.parent(ScopeId::GLOBAL), None);
    assert_eq!(tree.depth(ScopeId::GLOBAL), 0);
}

#[test]
fn nesting_forms_a_tree() {
    let mut tree = ScopeTree::new();
    let fn_scope = tree.new_scope(ScopeId::GLOBAL);
    let block = tree.new_scope(fn_scope);
    let sibling = tree.new_scope(fn_scope);

    assert_eq!(tree.parent(block), Some(fn_scope));
    assert_eq!(tree.parent(sibling), Some(fn_scope));
    assert_eq!(tree.depth(block), 2);

    let chain: Vec<_> = tree.chain(block).collect();
    assert_eq!(chain, vec![block, fn_scope, ScopeId::GLOBAL]);
}
