//! Maximum-weight matching on a general graph (Edmonds' blossom algorithm
//! with Gabow's O(n³) labelling).
//!
//! Vertices are 1-based inside the solver and 0 means "none". Indices above
//! `n` name contracted blossoms. Vertex duals are stored doubled in `lab` so
//! integer weights keep every dual integral.

use std::collections::VecDeque;

const EVEN: i8 = 0;
const ODD: i8 = 1;
const FREE: i8 = -1;

#[derive(Debug, Clone, Copy, Default)]
struct Edge {
    u: usize,
    v: usize,
    w: i64,
}

/// Maximum-weight matching of a symmetric weight matrix.
///
/// Entries `<= 0` are treated as missing edges and the diagonal is ignored.
/// Returns the partner of every vertex, 0-based.
pub(crate) fn max_weight_matching(weights: &[Vec<i64>]) -> Vec<Option<usize>> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }

    let mut blossom = Blossom::new(weights);
    while blossom.augment_once() {}

    (1..=n)
        .map(|u| match blossom.mate[u] {
            0 => None,
            v => Some(v - 1),
        })
        .collect()
}

struct Blossom {
    n: usize,
    n_x: usize,
    g: Vec<Vec<Edge>>,
    lab: Vec<i64>,
    mate: Vec<usize>,
    slack: Vec<usize>,
    st: Vec<usize>,
    pa: Vec<usize>,
    flower_from: Vec<Vec<usize>>,
    label: Vec<i8>,
    vis: Vec<usize>,
    stamp: usize,
    flower: Vec<Vec<usize>>,
    queue: VecDeque<usize>,
}

impl Blossom {
    fn new(weights: &[Vec<i64>]) -> Self {
        let n = weights.len();
        let size = 2 * n + 1;

        let mut g: Vec<Vec<Edge>> = (0..size)
            .map(|u| (0..size).map(|v| Edge { u, v, w: 0 }).collect())
            .collect();
        let mut w_max = 0;
        for u in 1..=n {
            for v in 1..=n {
                if u != v {
                    let w = weights[u - 1][v - 1].max(0);
                    g[u][v].w = w;
                    w_max = w_max.max(w);
                }
            }
        }

        let mut flower_from = vec![vec![0; n + 1]; size];
        for (u, row) in flower_from.iter_mut().enumerate().take(n + 1).skip(1) {
            row[u] = u;
        }

        let mut lab = vec![0; size];
        for dual in lab.iter_mut().take(n + 1).skip(1) {
            *dual = w_max;
        }

        let mut st = vec![0; size];
        for (u, s) in st.iter_mut().enumerate().take(n + 1) {
            *s = u;
        }

        Self {
            n,
            n_x: n,
            g,
            lab,
            mate: vec![0; size],
            slack: vec![0; size],
            st,
            pa: vec![0; size],
            flower_from,
            label: vec![FREE; size],
            vis: vec![0; size],
            stamp: 0,
            flower: vec![Vec::new(); size],
            queue: VecDeque::new(),
        }
    }

    fn e_delta(&self, e: Edge) -> i64 {
        self.lab[e.u] + self.lab[e.v] - e.w * 2
    }

    fn update_slack(&mut self, u: usize, x: usize) {
        let current = self.slack[x];
        if current == 0 || self.e_delta(self.g[u][x]) < self.e_delta(self.g[current][x]) {
            self.slack[x] = u;
        }
    }

    fn set_slack(&mut self, x: usize) {
        self.slack[x] = 0;
        for u in 1..=self.n {
            if self.g[u][x].w > 0 && self.st[u] != x && self.label[self.st[u]] == EVEN {
                self.update_slack(u, x);
            }
        }
    }

    fn q_push(&mut self, x: usize) {
        if x <= self.n {
            self.queue.push_back(x);
        } else {
            for i in 0..self.flower[x].len() {
                let y = self.flower[x][i];
                self.q_push(y);
            }
        }
    }

    fn set_st(&mut self, x: usize, b: usize) {
        self.st[x] = b;
        if x > self.n {
            for i in 0..self.flower[x].len() {
                let y = self.flower[x][i];
                self.set_st(y, b);
            }
        }
    }

    /// Position of `xr` in blossom `b`, reorienting the cycle so the path
    /// from the base to `xr` has even length
    fn get_pr(&mut self, b: usize, xr: usize) -> usize {
        let pr = self.flower[b].iter().position(|&x| x == xr).unwrap_or(0);
        if pr % 2 == 1 {
            self.flower[b][1..].reverse();
            self.flower[b].len() - pr
        } else {
            pr
        }
    }

    fn set_match(&mut self, u: usize, v: usize) {
        let e = self.g[u][v];
        self.mate[u] = e.v;
        if u > self.n {
            let xr = self.flower_from[u][e.u];
            let pr = self.get_pr(u, xr);
            for i in 0..pr {
                let (a, b) = (self.flower[u][i], self.flower[u][i ^ 1]);
                self.set_match(a, b);
            }
            self.set_match(xr, v);
            self.flower[u].rotate_left(pr);
        }
    }

    fn augment(&mut self, mut u: usize, mut v: usize) {
        loop {
            let xnv = self.st[self.mate[u]];
            self.set_match(u, v);
            if xnv == 0 {
                return;
            }
            let next = self.st[self.pa[xnv]];
            self.set_match(xnv, next);
            u = next;
            v = xnv;
        }
    }

    fn get_lca(&mut self, mut u: usize, mut v: usize) -> usize {
        self.stamp += 1;
        while u != 0 || v != 0 {
            if u != 0 {
                if self.vis[u] == self.stamp {
                    return u;
                }
                self.vis[u] = self.stamp;
                u = self.st[self.mate[u]];
                if u != 0 {
                    u = self.st[self.pa[u]];
                }
            }
            std::mem::swap(&mut u, &mut v);
        }
        0
    }

    fn add_blossom(&mut self, u: usize, lca: usize, v: usize) {
        let mut b = self.n + 1;
        while b <= self.n_x && self.st[b] != 0 {
            b += 1;
        }
        if b > self.n_x {
            self.n_x += 1;
        }
        self.lab[b] = 0;
        self.label[b] = EVEN;
        self.mate[b] = self.mate[lca];

        let mut cycle = vec![lca];
        let mut x = u;
        while x != lca {
            let y = self.st[self.mate[x]];
            cycle.push(x);
            cycle.push(y);
            self.q_push(y);
            x = self.st[self.pa[y]];
        }
        cycle[1..].reverse();
        let mut x = v;
        while x != lca {
            let y = self.st[self.mate[x]];
            cycle.push(x);
            cycle.push(y);
            self.q_push(y);
            x = self.st[self.pa[y]];
        }
        self.flower[b] = cycle;
        self.set_st(b, b);

        for x in 1..=self.n_x {
            self.g[b][x].w = 0;
            self.g[x][b].w = 0;
        }
        for x in 1..=self.n {
            self.flower_from[b][x] = 0;
        }
        for i in 0..self.flower[b].len() {
            let xs = self.flower[b][i];
            for x in 1..=self.n_x {
                if self.g[b][x].w == 0 || self.e_delta(self.g[xs][x]) < self.e_delta(self.g[b][x])
                {
                    self.g[b][x] = self.g[xs][x];
                    self.g[x][b] = self.g[x][xs];
                }
            }
            for x in 1..=self.n {
                if self.flower_from[xs][x] != 0 {
                    self.flower_from[b][x] = xs;
                }
            }
        }
        self.set_slack(b);
    }

    fn expand_blossom(&mut self, b: usize) {
        for i in 0..self.flower[b].len() {
            let xs = self.flower[b][i];
            self.set_st(xs, xs);
        }
        let xr = self.flower_from[b][self.g[b][self.pa[b]].u];
        let pr = self.get_pr(b, xr);
        for i in (0..pr).step_by(2) {
            let (xs, xns) = (self.flower[b][i], self.flower[b][i + 1]);
            self.pa[xs] = self.g[xns][xs].u;
            self.label[xs] = ODD;
            self.label[xns] = EVEN;
            self.slack[xs] = 0;
            self.set_slack(xns);
            self.q_push(xns);
        }
        self.label[xr] = ODD;
        self.pa[xr] = self.pa[b];
        for i in pr + 1..self.flower[b].len() {
            let xs = self.flower[b][i];
            self.label[xs] = FREE;
            self.set_slack(xs);
        }
        self.st[b] = 0;
    }

    /// Handle a tight edge; true when it completed an augmenting path
    fn on_found_edge(&mut self, e: Edge) -> bool {
        let (u, v) = (self.st[e.u], self.st[e.v]);
        if self.label[v] == FREE {
            self.pa[v] = e.u;
            self.label[v] = ODD;
            let nu = self.st[self.mate[v]];
            self.slack[v] = 0;
            self.slack[nu] = 0;
            self.label[nu] = EVEN;
            self.q_push(nu);
        } else if self.label[v] == EVEN {
            let lca = self.get_lca(u, v);
            if lca == 0 {
                self.augment(u, v);
                self.augment(v, u);
                return true;
            }
            self.add_blossom(u, lca, v);
        }
        false
    }

    /// One phase: grow alternating trees until an augmenting path is found
    /// (true) or no dual adjustment can improve the matching (false)
    fn augment_once(&mut self) -> bool {
        for x in 1..=self.n_x {
            self.label[x] = FREE;
            self.slack[x] = 0;
        }
        self.queue.clear();
        for x in 1..=self.n_x {
            if self.st[x] == x && self.mate[x] == 0 {
                self.pa[x] = 0;
                self.label[x] = EVEN;
                self.q_push(x);
            }
        }
        if self.queue.is_empty() {
            return false;
        }

        loop {
            while let Some(u) = self.queue.pop_front() {
                if self.label[self.st[u]] == ODD {
                    continue;
                }
                for v in 1..=self.n {
                    let e = self.g[u][v];
                    if e.w > 0 && self.st[u] != self.st[v] {
                        if self.e_delta(e) == 0 {
                            if self.on_found_edge(e) {
                                return true;
                            }
                        } else {
                            let sv = self.st[v];
                            self.update_slack(u, sv);
                        }
                    }
                }
            }

            let mut d = i64::MAX;
            for b in self.n + 1..=self.n_x {
                if self.st[b] == b && self.label[b] == ODD {
                    d = d.min(self.lab[b] / 2);
                }
            }
            for x in 1..=self.n_x {
                if self.st[x] == x && self.slack[x] != 0 {
                    let delta = self.e_delta(self.g[self.slack[x]][x]);
                    match self.label[x] {
                        FREE => d = d.min(delta),
                        EVEN => d = d.min(delta / 2),
                        _ => {}
                    }
                }
            }

            for u in 1..=self.n {
                match self.label[self.st[u]] {
                    EVEN => {
                        if self.lab[u] <= d {
                            return false;
                        }
                        self.lab[u] -= d;
                    }
                    ODD => self.lab[u] += d,
                    _ => {}
                }
            }
            for b in self.n + 1..=self.n_x {
                if self.st[b] == b {
                    match self.label[b] {
                        EVEN => self.lab[b] += d * 2,
                        ODD => self.lab[b] -= d * 2,
                        _ => {}
                    }
                }
            }

            self.queue.clear();
            // add_blossom may raise n_x while this scan runs
            let mut x = 1;
            while x <= self.n_x {
                let s = self.slack[x];
                let e = self.g[s][x];
                if self.st[x] == x
                    && s != 0
                    && self.st[s] != x
                    && self.e_delta(e) == 0
                    && self.on_found_edge(e)
                {
                    return true;
                }
                x += 1;
            }
            for b in self.n + 1..=self.n_x {
                if self.st[b] == b && self.label[b] == ODD && self.lab[b] == 0 {
                    self.expand_blossom(b);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(weights: &[Vec<i64>], mates: &[Option<usize>]) -> i64 {
        mates
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.filter(|&j| i < j).map(|j| weights[i][j]))
            .sum()
    }

    fn symmetric(n: usize, score: impl Fn(usize, usize) -> i64) -> Vec<Vec<i64>> {
        (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { 0 } else { score(i.min(j), i.max(j)) })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_empty_graph() {
        assert!(max_weight_matching(&[]).is_empty());
    }

    #[test]
    fn test_single_edge() {
        let mates = max_weight_matching(&symmetric(2, |_, _| 7));
        assert_eq!(mates, vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_prefers_heavier_path_ends() {
        // Path 0-1-2-3 with a heavy middle edge
        let w = symmetric(4, |i, j| match (i, j) {
            (0, 1) | (2, 3) => 4,
            (1, 2) => 6,
            _ => 0,
        });
        let mates = max_weight_matching(&w);
        assert_eq!(total(&w, &mates), 8);
        assert_eq!(mates[0], Some(1));
    }

    #[test]
    fn test_odd_cycle_needs_blossom() {
        // Triangle 0-1-2 with a pendant 3 on vertex 2
        let w = symmetric(4, |i, j| match (i, j) {
            (0, 1) | (0, 2) | (1, 2) => 5,
            (2, 3) => 4,
            _ => 0,
        });
        let mates = max_weight_matching(&w);
        assert_eq!(total(&w, &mates), 9);
        assert_eq!(mates[3], Some(2));
    }

    #[test]
    fn test_mates_are_symmetric() {
        let w = symmetric(9, |i, j| ((i * 5 + j * 3) % 7) as i64 + 1);
        let mates = max_weight_matching(&w);
        for (i, m) in mates.iter().enumerate() {
            if let Some(j) = *m {
                assert_eq!(mates[j], Some(i));
            }
        }
    }
}
