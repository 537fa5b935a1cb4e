use binary_heap_plus::BinaryHeap;
use ndarray::prelude::*;

use crate::vectors::WordVectors;

pub(crate) fn norm_l2<S, D>(a: &ArrayBase<S, D>) -> f32
where
    S: ndarray::Data<Elem = f32>,
    D: ndarray::Dimension,
{
    a.iter().map(|x| *x * *x).sum::<f32>().sqrt()
}

/// cosine similarity between two rows
pub fn sim(wv: &WordVectors, id1: usize, id2: usize) -> f32 {
    let v1 = wv.vecs.row(id1);
    let v2 = wv.vecs.row(id2);
    if wv.normed {
        v1.dot(&v2)
    } else {
        let n = norm_l2(&v1) * norm_l2(&v2);
        if n > 0. {
            v1.dot(&v2) / n
        } else {
            0.
        }
    }
}

/// Top-k rows most similar to `head_id` by cosine, the query row itself
/// excluded. Ordered by descending similarity; ties broken by candidate
/// word so the output is reproducible.
pub fn nearest(wv: &WordVectors, head_id: usize, top_k: usize) -> Vec<(u32, f32)> {
    // all-zero rows (a fully clipped PPMI row) keep their zeros and score 0
    let qvec_r = wv.vecs.row(head_id);
    let qnorm = norm_l2(&qvec_r);
    let qvec = if qnorm > 0. {
        qvec_r.mapv(|v| v / qnorm)
    } else {
        qvec_r.to_owned()
    };

    let sf = |(id1, sim1): &(u32, f32), (id2, sim2): &(u32, f32)| {
        sim2.partial_cmp(sim1)
            .unwrap_or_else(|| match (sim2.is_nan(), sim1.is_nan()) {
                (true, true) => std::cmp::Ordering::Equal,
                (false, true) => std::cmp::Ordering::Greater,
                (true, false) => std::cmp::Ordering::Less,
                (false, false) => panic!(),
            })
            .then_with(|| wv.id2str[*id1 as usize].cmp(&wv.id2str[*id2 as usize]))
    };

    let mut heap = BinaryHeap::new_by(sf);

    for i in 0..wv.len() {
        if i == head_id {
            continue;
        }
        let v = wv.vecs.row(i);
        let sim = if wv.normed {
            qvec.dot(&v)
        } else {
            let n = norm_l2(&v);
            if n > 0. {
                qvec.dot(&v) / n
            } else {
                0.
            }
        };
        heap.push((i as u32, sim));
        if heap.len() > top_k {
            heap.pop();
        }
    }

    let mut hv: Vec<_> = heap.drain().collect();
    hv.sort_by(sf);
    hv
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use std::collections::HashMap;

    fn wv(rows: &[(&str, &[f32])]) -> WordVectors {
        let dim = rows[0].1.len();
        let data: Vec<f32> = rows.iter().flat_map(|(_, v)| v.iter().copied()).collect();
        WordVectors {
            vecs: Array2::from_shape_vec((rows.len(), dim), data).unwrap(),
            id2str: rows.iter().map(|(w, _)| w.to_string()).collect(),
            str2id: rows
                .iter()
                .enumerate()
                .map(|(i, (w, _))| (w.to_string(), i as u32))
                .collect::<HashMap<_, _>>(),
            normed: false,
        }
    }

    fn pets() -> WordVectors {
        wv(&[
            ("cat", &[1., 0.]),
            ("dog", &[0.9, 0.1]),
            ("car", &[0., 1.]),
        ])
    }

    #[test]
    fn test_worked_example() {
        let hv = nearest(&pets(), 0, 2);
        assert_eq!(hv.len(), 2);
        assert_eq!(hv[0].0, 1);
        assert!((hv[0].1 - 0.99388).abs() < 1e-4);
        assert_eq!(hv[1].0, 2);
        assert_eq!(hv[1].1, 0.);
    }

    #[test]
    fn test_excludes_query() {
        let v = pets();
        for id in 0..v.len() {
            for (i, _) in nearest(&v, id, 10) {
                assert_ne!(i as usize, id);
            }
        }
    }

    #[test]
    fn test_scores_non_increasing() {
        let v = wv(&[
            ("a", &[1., 0., 0.]),
            ("b", &[0.5, 0.5, 0.]),
            ("c", &[0., 1., 0.]),
            ("d", &[0., 0., 1.]),
            ("e", &[0.7, 0.1, 0.2]),
        ]);
        for id in 0..v.len() {
            let hv = nearest(&v, id, 10);
            for w in hv.windows(2) {
                assert!(w[0].1 >= w[1].1);
            }
        }
    }

    #[test]
    fn test_k_covers_vocabulary() {
        let v = pets();
        let hv = nearest(&v, 1, v.len() - 1);
        let mut ids: Vec<_> = hv.iter().map(|(i, _)| *i).collect();
        ids.sort();
        assert_eq!(ids, [0, 2]);

        // oversized k returns everything available
        assert_eq!(nearest(&v, 1, 100).len(), 2);
    }

    #[test]
    fn test_sim_symmetric() {
        let v = wv(&[("a", &[1., 2., 3.]), ("b", &[4., 5., 6.])]);
        assert_eq!(sim(&v, 0, 1), sim(&v, 1, 0));
    }

    #[test]
    fn test_sim_normed_agrees() {
        let mut v = pets();
        let raw = sim(&v, 0, 1);
        v.norm();
        assert!((sim(&v, 0, 1) - raw).abs() < 1e-6);
    }

    #[test]
    fn test_zero_rows_score_zero() {
        let v = wv(&[
            ("zero", &[0., 0.]),
            ("cat", &[1., 0.]),
            ("dog", &[0.9, 0.1]),
        ]);
        for (_, s) in nearest(&v, 0, 2) {
            assert_eq!(s, 0.);
        }
        // zero candidate against a real query
        let hv = nearest(&v, 1, 2);
        assert_eq!(hv[1].0, 0);
        assert_eq!(hv[1].1, 0.);
        assert_eq!(sim(&v, 0, 1), 0.);
    }

    #[test]
    fn test_lexicographic_ties() {
        let v = wv(&[
            ("query", &[2., 2.]),
            ("delta", &[1., 1.]),
            ("alpha", &[1., 1.]),
        ]);
        let hv = nearest(&v, 0, 2);
        assert_eq!(hv[0].0, 2);
        assert_eq!(hv[1].0, 1);
        assert_eq!(hv[0].1, hv[1].1);
    }
}
