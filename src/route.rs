use crate::Error;
use heapdict::HeapDict;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

type Distance = OrderedFloat<f64>;

#[derive(Debug, Deserialize, Clone)]
pub struct RouteConfig {
    pub source: String,
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub edges: Vec<EdgeConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EdgeConfig {
    pub from: String,
    pub to: String,
    pub weight: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Route {
    pub node: String,
    pub distance: f64,
    pub path: Vec<String>,
}

#[derive(Debug)]
struct Graph<'a> {
    adj: FxHashMap<&'a str, Vec<(&'a str, Distance)>>,
}

impl<'a> Graph<'a> {
    fn new(config: &'a RouteConfig) -> Result<Self, Error> {
        let mut adj: FxHashMap<&str, Vec<_>> = FxHashMap::default();
        for e in &config.edges {
            if !e.weight.is_finite() || e.weight < 0.0 {
                return Err(Error::InvalidWeight {
                    from: e.from.clone(),
                    to: e.to.clone(),
                    weight: e.weight,
                });
            }
            let w = OrderedFloat(e.weight);
            adj.entry(e.from.as_str())
                .or_default()
                .push((e.to.as_str(), w));
            let back = adj.entry(e.to.as_str()).or_default();
            if !config.directed {
                back.push((e.from.as_str(), w));
            }
        }
        Ok(Graph { adj })
    }

    fn neighbors(&self, node: &str) -> impl Iterator<Item = &(&'a str, Distance)> {
        self.adj.get(node).into_iter().flatten()
    }
}

/// Dijkstra from `config.source`. Returns every reachable node, nearest
/// first, ties by name.
pub fn shortest_routes(config: &RouteConfig) -> Result<Vec<Route>, Error> {
    let graph = Graph::new(config)?;
    let source = config.source.as_str();
    if !graph.adj.contains_key(source) {
        return Err(Error::UnknownNode(config.source.clone()));
    }
    let mut frontier = HeapDict::with_capacity(graph.adj.len());
    let mut settled: FxHashMap<&str, Distance> = FxHashMap::default();
    let mut prev: FxHashMap<&str, &str> = FxHashMap::default();
    frontier.set(source, OrderedFloat(0.0));
    while let Ok((u, d)) = frontier.pop() {
        settled.insert(u, d);
        for &(v, w) in graph.neighbors(u) {
            if !settled.contains_key(v) && frontier.improve(v, d + w) {
                prev.insert(v, u);
            }
        }
    }
    Ok(settled
        .into_iter()
        .map(|(node, d)| Route {
            node: node.to_string(),
            distance: d.0,
            path: path_to(&prev, source, node),
        })
        .sorted_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.node.cmp(&b.node))
        })
        .collect())
}

fn path_to(prev: &FxHashMap<&str, &str>, source: &str, node: &str) -> Vec<String> {
    let mut path = vec![node.to_string()];
    let mut current = node;
    while current != source {
        match prev.get(current) {
            Some(&p) => {
                path.push(p.to_string());
                current = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: &str, to: &str, weight: f64) -> EdgeConfig {
        EdgeConfig {
            from: from.to_string(),
            to: to.to_string(),
            weight,
        }
    }

    fn config(directed: bool) -> RouteConfig {
        //   A --2-- B --1-- D --4-- E
        //   |                       |
        //   +--10-- C ------0-------+
        RouteConfig {
            source: "A".to_string(),
            directed,
            edges: vec![
                edge("A", "B", 2.),
                edge("A", "C", 10.),
                edge("D", "B", 1.),
                edge("D", "E", 4.),
                edge("C", "E", 0.),
            ],
        }
    }

    fn summary(routes: &[Route]) -> Vec<(&str, f64, String)> {
        routes
            .iter()
            .map(|r| (r.node.as_str(), r.distance, r.path.join("")))
            .collect()
    }

    #[test]
    fn undirected() {
        let routes = shortest_routes(&config(false)).unwrap();
        assert_eq!(
            summary(&routes),
            [
                ("A", 0., "A".to_string()),
                ("B", 2., "AB".to_string()),
                ("D", 3., "ABD".to_string()),
                ("C", 7., "ABDEC".to_string()),
                ("E", 7., "ABDE".to_string()),
            ]
        );
    }

    #[test]
    fn directed_skips_reverse_edges() {
        let routes = shortest_routes(&config(true)).unwrap();
        assert_eq!(
            summary(&routes),
            [
                ("A", 0., "A".to_string()),
                ("B", 2., "AB".to_string()),
                ("C", 10., "AC".to_string()),
                ("E", 10., "ACE".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_bad_input() {
        let mut c = config(false);
        c.source = "Z".to_string();
        assert!(matches!(shortest_routes(&c), Err(Error::UnknownNode(n)) if n == "Z"));
        let mut c = config(false);
        c.edges.push(edge("E", "F", -1.));
        assert!(matches!(
            shortest_routes(&c),
            Err(Error::InvalidWeight { weight, .. }) if weight == -1.
        ));
        let mut c = config(false);
        c.edges.push(edge("E", "F", f64::NAN));
        assert!(shortest_routes(&c).is_err());
    }
}
