use proptest::prelude::*;

use docdag::reactor::{ModulePath, ReverseScheduler};
use docdag_test_utils::builders::{fire_log, recording_action};

/// Strategy producing a random module tree plus a random submission order.
///
/// We generate a parent-seed list and sanitize it so that node `i`'s parent
/// is always an earlier node: the result is a well-formed tree with node 0
/// as the root. The submission order is an arbitrary permutation of all
/// nodes — the scheduler must produce bottom-up execution regardless.
fn tree_and_order(max_nodes: usize) -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    (1..=max_nodes).prop_flat_map(|n| {
        let parent_seed = proptest::collection::vec(any::<usize>(), n.saturating_sub(1));
        let order = Just((0..n).collect::<Vec<usize>>()).prop_shuffle();
        (parent_seed, order)
    })
}

struct TreeFacts {
    paths: Vec<String>,
    children: Vec<Vec<String>>,
    parent: Vec<Option<usize>>,
}

fn build_tree(parent_seed: &[usize]) -> TreeFacts {
    let n = parent_seed.len() + 1;
    let mut paths = vec!["m0".to_string()];
    let mut children: Vec<Vec<String>> = vec![Vec::new(); n];
    let mut parent = vec![None];

    for i in 1..n {
        let p = parent_seed[i - 1] % i;
        let name = format!("m{i}");
        paths.push(format!("{}/{}", paths[p], name));
        children[p].push(name);
        parent.push(Some(p));
    }

    TreeFacts {
        paths,
        children,
        parent,
    }
}

proptest! {
    #[test]
    fn test_every_module_fires_once_bottom_up(
        (parent_seed, order) in tree_and_order(10)
    ) {
        let facts = build_tree(&parent_seed);
        let log = fire_log();
        let mut scheduler = ReverseScheduler::new();

        for &i in &order {
            let path = ModulePath::new(&facts.paths[i]).unwrap();
            scheduler
                .submit(&path, &facts.children[i], recording_action(&log, path.as_str()))
                .expect("consistent declarations must be accepted");
        }

        let fired = log.lock().unwrap().clone();
        prop_assert_eq!(fired.len(), facts.paths.len(), "every module fires exactly once");

        let position = |path: &str| fired.iter().position(|p| p == path).unwrap();
        for i in 1..facts.paths.len() {
            let p = facts.parent[i].unwrap();
            prop_assert!(
                position(&facts.paths[i]) < position(&facts.paths[p]),
                "child {} must fire before parent {}",
                facts.paths[i],
                facts.paths[p]
            );
        }

        scheduler.finish().expect("no module may be left pending");
    }
}
