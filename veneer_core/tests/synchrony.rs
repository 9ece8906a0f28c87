// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Random topology edits keep the surface tree, the solver, and the
//! backend's containers in the same shape.

use std::collections::BTreeMap;

use kurbo::Size;
use proptest::prelude::*;
use veneer_backend_headless::HeadlessBackend;
use veneer_core::layout::TaffySolver;
use veneer_core::props::PropertyDelta;
use veneer_core::trace::Tracer;
use veneer_core::{FrameDriver, NodeId, SurfaceKind, SurfaceTree};

type Tree = SurfaceTree<TaffySolver, HeadlessBackend>;

const ROW: f64 = 10.0;

#[derive(Clone, Debug)]
enum Op {
    Create,
    Append(usize, usize),
    InsertBefore(usize, usize, usize),
    Remove(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Create),
        3 => (any::<usize>(), any::<usize>()).prop_map(|(p, c)| Op::Append(p, c)),
        2 => (any::<usize>(), any::<usize>(), any::<usize>())
            .prop_map(|(p, c, r)| Op::InsertBefore(p, c, r)),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(p, c)| Op::Remove(p, c)),
    ]
}

/// Parent and child lists as the edits should leave them.
#[derive(Default)]
struct Model {
    live: Vec<NodeId>,
    parent: BTreeMap<NodeId, NodeId>,
    children: BTreeMap<NodeId, Vec<NodeId>>,
}

impl Model {
    fn pick(&self, selector: usize) -> NodeId {
        self.live[selector % self.live.len()]
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent.get(&id) {
                Some(&p) => id = p,
                None => return false,
            }
        }
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(p) = self.parent.remove(&child) {
            self.children.entry(p).or_default().retain(|&c| c != child);
        }
    }

    fn destroy(&mut self, id: NodeId) {
        for child in self.children.remove(&id).unwrap_or_default() {
            self.parent.remove(&child);
            self.destroy(child);
        }
        self.live.retain(|&n| n != id);
    }

    fn attached(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = vec![root];
        let mut i = 0;
        while i < out.len() {
            out.extend(self.kids(out[i]));
            i += 1;
        }
        out
    }

    fn kids(&self, id: NodeId) -> Vec<NodeId> {
        self.children.get(&id).cloned().unwrap_or_default()
    }
}

fn create(tree: &mut Tree) -> NodeId {
    let id = tree.create_node(SurfaceKind::View).unwrap();
    tree.update_props(
        id,
        &PropertyDelta::new().set("height", ROW).set("flexShrink", 0.0),
    )
    .unwrap();
    id
}

fn apply(tree: &mut Tree, model: &mut Model, op: &Op) {
    let root = tree.root();
    match *op {
        Op::Create => {
            let id = create(tree);
            model.live.push(id);
        }
        Op::Append(p, c) => {
            let (parent, child) = (model.pick(p), model.pick(c));
            if child == root || model.is_ancestor_or_self(child, parent) {
                return;
            }
            tree.append_child(parent, child).unwrap();
            model.detach(child);
            model.children.entry(parent).or_default().push(child);
            model.parent.insert(child, parent);
        }
        Op::InsertBefore(p, c, r) => {
            let parent = model.pick(p);
            let kids = model.kids(parent);
            if kids.is_empty() {
                return;
            }
            let (child, reference) = (model.pick(c), kids[r % kids.len()]);
            if child == root || model.is_ancestor_or_self(child, parent) {
                return;
            }
            tree.insert_before(parent, child, reference).unwrap();
            if child == reference {
                return;
            }
            model.detach(child);
            let list = model.children.entry(parent).or_default();
            let at = list
                .iter()
                .position(|&n| n == reference)
                .expect("reference stays a child");
            list.insert(at, child);
            model.parent.insert(child, parent);
        }
        Op::Remove(p, c) => {
            let parent = model.pick(p);
            let kids = model.kids(parent);
            if kids.is_empty() {
                return;
            }
            let child = kids[c % kids.len()];
            tree.remove_child(parent, child).unwrap();
            model.detach(child);
            model.destroy(child);
        }
    }
}

fn check(tree: &mut Tree, model: &Model) -> Result<(), TestCaseError> {
    FrameDriver::default().flush(tree, &mut Tracer::none()).unwrap();

    prop_assert_eq!(tree.len(), model.live.len());
    prop_assert_eq!(tree.solver().node_count(), model.live.len());
    prop_assert_eq!(tree.backend().live_count(), 2 * model.live.len());

    for &id in &model.live {
        prop_assert!(tree.is_alive(id));
        let kids = model.kids(id);
        let surface: Vec<NodeId> = tree.children(id).collect();
        prop_assert_eq!(&surface, &kids, "surface children of {:?}", id);

        let roots: Vec<_> = kids.iter().map(|&k| tree.primitives(k).root).collect();
        let container = tree.primitives(id).children;
        prop_assert_eq!(tree.backend().children_of(container), &roots[..]);

        prop_assert_eq!(tree.parent(id), model.parent.get(&id).copied());
    }

    // Children stack in a column, so each one's offset gives its position
    // in the solver's child list.
    for id in model.attached(tree.root()) {
        for (i, &kid) in model.kids(id).iter().enumerate() {
            let y = tree.computed_box(kid).y0;
            prop_assert_eq!(y, ROW * i as f64, "{:?} is child #{} of {:?}", kid, i, id);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_edits_stay_in_sync(ops in prop::collection::vec(op(), 1..40)) {
        let mut tree = Tree::new(TaffySolver::new(), HeadlessBackend::new(), Size::new(400.0, 400.0))
            .unwrap();
        let mut model = Model {
            live: vec![tree.root()],
            ..Model::default()
        };
        check(&mut tree, &model)?;
        for op in &ops {
            apply(&mut tree, &mut model, op);
            check(&mut tree, &model)?;
        }
    }
}

#[test]
fn solver_nodes_are_released_with_their_surfaces() {
    let mut tree = Tree::new(TaffySolver::new(), HeadlessBackend::new(), Size::new(100.0, 100.0))
        .unwrap();
    let root = tree.root();
    let ids: Vec<_> = (0..4).map(|_| create(&mut tree)).collect();
    for pair in ids.windows(2) {
        tree.append_child(pair[0], pair[1]).unwrap();
    }
    tree.append_child(root, ids[0]).unwrap();
    let handles: Vec<_> = ids.iter().map(|&id| tree.handle(id)).collect();

    tree.remove_child(root, ids[0]).unwrap();
    assert_eq!(tree.solver().node_count(), 1, "only the root's node is left");
    assert_eq!(tree.backend().live_count(), 2);
    assert_eq!(tree.backend().released_count(), 8);
    assert_eq!(tree.registry().released(), 4);
    assert!(handles.iter().all(|&h| tree.resolve(h).is_none()), "handles are dead");
}
