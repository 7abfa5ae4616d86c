//! Integration tests for tree ownership and disposal.

mod common;

#[cfg(test)]
mod tests {
    use arbor::{
        Core, NodeId,
        error::{Error, Result},
        widgets::Label,
    };
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use crate::common::{Leaf, log};

    /// Every live child points back at its parent and is reachable from
    /// the root exactly once.
    fn check_ownership(core: &Core) {
        let root = core.root_id();
        let reachable = core.subtree(root);
        assert_eq!(reachable.len(), core.len());
        for id in &reachable {
            for child in core.children(*id) {
                assert_eq!(core.parent(*child), Some(*id));
            }
        }
        let mut sorted = reachable.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), reachable.len());
    }

    #[test]
    fn attach_rejects_bad_edges() -> Result<()> {
        let l = log();
        let mut core = Core::new();
        let root = core.root_id();
        let a = core.push_child(root, Leaf::new("a", &l));
        let b = core.push_child(a, Leaf::new("b", &l));

        assert!(matches!(core.try_attach(root, 0, b), Err(Error::AlreadyAttached(_))));
        assert!(matches!(core.try_attach(a, 0, root), Err(Error::AlreadyAttached(_))));

        let loose = core.create_detached(Leaf::new("loose", &l));
        assert!(matches!(
            core.try_attach(root, 5, loose),
            Err(Error::IndexOutOfBounds { index: 5, len: 1 })
        ));
        core.try_attach(root, 0, loose)?;
        assert_eq!(core.children(root), &[loose, a]);

        let orphan = core.create_detached(Leaf::new("orphan", &l));
        let orphan_child = core.create_detached(Label::new("x"));
        core.try_attach(orphan, 0, orphan_child)?;
        assert!(matches!(
            core.try_attach(orphan_child, 0, orphan),
            Err(Error::WouldCreateCycle { .. })
        ));

        assert!(matches!(core.try_remove_child(root, b), Err(Error::NotAChild { .. })));
        assert!(matches!(core.try_dispose(root), Err(Error::RootRemoval)));
        Ok(())
    }

    #[test]
    fn disposed_ids_never_resolve() -> Result<()> {
        let l = log();
        let mut core = Core::new();
        let root = core.root_id();
        let a = core.push_child(root, Leaf::new("a", &l));
        let b = core.push_child(a, Leaf::new("b", &l));
        let c = core.push_child(b, Leaf::new("c", &l));

        core.try_remove_child_at(root, 0)?;
        for id in [a, b, c] {
            assert!(!core.is_alive(id));
            assert!(core.node(id).is_none());
        }
        assert!(matches!(core.try_dispose(b), Err(Error::NodeNotFound(_))));

        // A new node never reuses a disposed id.
        let d = core.push_child(root, Leaf::new("d", &l));
        assert!(![a, b, c].contains(&d));
        assert_eq!(core.len(), 2);
        Ok(())
    }

    #[test]
    #[should_panic(expected = "already has a parent")]
    fn attaching_twice_is_fatal() {
        let l = log();
        let mut core = Core::new();
        let root = core.root_id();
        let a = core.push_child(root, Leaf::new("a", &l));
        core.attach(root, 0, a);
    }

    #[test]
    fn random_churn_keeps_ownership() {
        let l = log();
        let mut rng = StdRng::seed_from_u64(7);
        let mut core = Core::new();
        let root = core.root_id();
        let mut live: Vec<NodeId> = vec![root];
        let mut gone: Vec<NodeId> = Vec::new();

        for step in 0..500 {
            if live.len() > 1 && rng.random_bool(0.3) {
                let victim = live[rng.random_range(1..live.len())];
                let doomed = core.subtree(victim);
                core.dispose(victim);
                live.retain(|id| !doomed.contains(id));
                gone.extend(doomed);
            } else {
                let parent = live[rng.random_range(0..live.len())];
                let index = rng.random_range(0..=core.children(parent).len());
                let id = core.add_child(parent, index, Leaf::new(&format!("n{step}"), &l));
                assert_eq!(core.children(parent)[index], id);
                live.push(id);
            }
            if step % 50 == 0 {
                check_ownership(&core);
            }
        }
        check_ownership(&core);
        assert_eq!(core.len(), live.len());
        assert!(gone.iter().all(|id| !core.is_alive(*id)));
    }

    #[test]
    fn move_to_front_reorders_siblings() {
        let l = log();
        let mut core = Core::new();
        let root = core.root_id();
        let ids: Vec<NodeId> = ["a", "b", "c"]
            .iter()
            .map(|n| core.push_child(root, Leaf::new(n, &l)))
            .collect();
        core.move_to_front(ids[0]);
        assert_eq!(core.children(root), &[ids[1], ids[2], ids[0]]);
        assert!(core.is_ancestor(root, ids[0]));
        assert_eq!(core.ancestors(ids[0]), vec![ids[0], root]);
    }
}
