//! Pairwise column analyzers: ANOVA, correlation and cardinality.

use super::stats::{SIGNIFICANCE_LEVEL, least_squares, one_way_anova, pearson};
use super::{DescriberKind, Outcome};
use crate::dataset::Column;
use crate::dataset::value::{Value, ValueKey};
use crate::render::{Block, Inline};
use crate::utils::{fmt_num, fmt_opt, fmt_stat};
use std::collections::{HashMap, HashSet};

pub(super) fn evaluate(kind: DescriberKind, a: &Column, b: &Column) -> Outcome {
    match kind {
        DescriberKind::RelationshipAnova => anova(a, b),
        DescriberKind::RelationshipCorrelation => correlation(a, b),
        DescriberKind::RelationshipOneToMany => one_to_many(a, b),
        other => Outcome::invalid(format!("{other} does not describe a pair of columns")),
    }
}

/// Does the text column `group` separate the means of the numeric column `value`?
fn anova(group: &Column, value: &Column) -> Outcome {
    if !group.is_text() {
        return Outcome::invalid(format!("{} is not text", group.name()));
    }
    if !value.is_numeric() {
        return Outcome::invalid(format!("{} is not numeric", value.name()));
    }

    // Groups in first-appearance order; rows with a null value are skipped.
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut labels: Vec<&str> = Vec::new();
    let mut groups: Vec<Vec<f64>> = Vec::new();
    for (label, v) in group.values().iter().zip(value.values()) {
        let (Value::Text(label), Some(v)) = (label, v.as_f64()) else {
            continue;
        };
        let pos = *index.entry(label.as_str()).or_insert_with(|| {
            labels.push(label.as_str());
            groups.push(Vec::new());
            groups.len() - 1
        });
        if let Some(values) = groups.get_mut(pos) {
            values.push(v);
        }
    }

    let result = match one_way_anova(&groups) {
        Ok(result) => result,
        Err(e) => return Outcome::invalid(e.to_string()),
    };

    let (g, v) = (group.name(), value.name());
    if result.p >= SIGNIFICANCE_LEVEL {
        return Outcome::unqualified(format!(
            "{g} does not predict {v} means (p={})",
            fmt_stat(result.p)
        ))
        .with_metric("f_statistic", result.f)
        .with_metric("p_value", result.p);
    }

    let rows = labels
        .iter()
        .zip(&groups)
        .map(|(label, values)| {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            vec![Inline::value(g, label), Inline::text(fmt_stat(mean))]
        })
        .collect();

    Outcome::qualified(format!("{g} predicts {v} means"))
        .with_metric("f_statistic", result.f)
        .with_metric("p_value", result.p)
        .with_block(Block::Paragraph(vec![Inline::text(format!(
            "ANOVA F={}, p={}",
            fmt_stat(result.f),
            fmt_stat(result.p)
        ))]))
        .with_block(Block::Table {
            header: vec![Inline::Column(g.to_owned()), Inline::text(format!("mean {v}"))],
            rows,
            highlight: None,
        })
}

fn correlation(x: &Column, y: &Column) -> Outcome {
    if !x.is_numeric() {
        return Outcome::invalid(format!("{} is not numeric", x.name()));
    }
    if !y.is_numeric() {
        return Outcome::invalid(format!("{} is not numeric", y.name()));
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .values()
        .iter()
        .zip(y.values())
        .filter_map(|(a, b)| Some((a.as_f64()?, b.as_f64()?)))
        .unzip();

    let result = match pearson(&xs, &ys) {
        Ok(result) => result,
        Err(e) => return Outcome::invalid(e.to_string()),
    };

    let (a, b) = (x.name(), y.name());
    let with_stats = |outcome: Outcome| {
        outcome
            .with_metric("r", result.r)
            .with_metric("p_value", result.p)
            .with_metric("n", result.n as f64)
    };
    if result.p >= SIGNIFICANCE_LEVEL {
        return with_stats(Outcome::unqualified(format!(
            "{a} and {b} are not correlated (p={})",
            fmt_stat(result.p)
        )));
    }

    let mut outcome = with_stats(Outcome::qualified(format!(
        "{a} and {b} are correlated (r={}, p={})",
        fmt_stat(result.r),
        fmt_stat(result.p)
    )))
    .with_block(Block::Paragraph(vec![Inline::text(format!(
        "Pearson's correlation r={}, p={}",
        fmt_stat(result.r),
        fmt_stat(result.p)
    ))]));

    if let Some(fit) = least_squares(&xs, &ys) {
        outcome = outcome
            .with_metric("slope", fit.slope)
            .with_metric("intercept", fit.intercept)
            .with_block(Block::Paragraph(vec![
                Inline::text("Best fit: "),
                Inline::Column(b.to_owned()),
                Inline::text(format!(" = {} * ", fmt_opt(Some(fit.slope)))),
                Inline::Column(a.to_owned()),
                Inline::text(format!(" + {}", fmt_opt(Some(fit.intercept)))),
            ]))
            .with_block(Block::Preformatted(format!(
                "dependent:   {b}\nobservations: {}\nslope:       {}\nintercept:   {}\nr_squared:   {}",
                result.n,
                fmt_opt(Some(fit.slope)),
                fmt_opt(Some(fit.intercept)),
                fmt_opt(Some(fit.r_squared)),
            )));
    }
    outcome
}

/// Cardinality between two columns over rows where both are present.
fn one_to_many(a: &Column, b: &Column) -> Outcome {
    let mut a_to_b: HashMap<ValueKey, HashSet<ValueKey>> = HashMap::new();
    let mut b_to_a: HashMap<ValueKey, HashSet<ValueKey>> = HashMap::new();
    let mut pair_index: HashMap<(ValueKey, ValueKey), usize> = HashMap::new();
    let mut pairs: Vec<(&Value, &Value, usize)> = Vec::new();

    for (va, vb) in a.values().iter().zip(b.values()) {
        if va.is_null() || vb.is_null() {
            continue;
        }
        let (ka, kb) = (va.key(), vb.key());
        a_to_b.entry(ka.clone()).or_default().insert(kb.clone());
        b_to_a.entry(kb.clone()).or_default().insert(ka.clone());
        match pair_index.get(&(ka.clone(), kb.clone())) {
            Some(&pos) => {
                if let Some(pair) = pairs.get_mut(pos) {
                    pair.2 += 1;
                }
            }
            None => {
                pair_index.insert((ka, kb), pairs.len());
                pairs.push((va, vb, 1));
            }
        }
    }

    let (na, nb) = (a.name(), b.name());
    let max_fan_out =
        |map: &HashMap<ValueKey, HashSet<ValueKey>>| map.values().map(HashSet::len).max();
    let (Some(a_max), Some(b_max)) = (max_fan_out(&a_to_b), max_fan_out(&b_to_a)) else {
        return Outcome::unqualified(format!("{na} and {nb} have no rows with both values"));
    };

    let outcome = match (a_max, b_max) {
        (1, 1) => Outcome::qualified(format!("{na} and {nb} have a 1:1 mapping")),
        (_, 1) => Outcome::qualified(format!(
            "{na} has a 1:many mapping to {nb} (1:{a_max} max)"
        )),
        (1, _) => Outcome::qualified(format!(
            "{nb} has a 1:many mapping to {na} (1:{b_max} max)"
        )),
        _ => Outcome::unqualified(format!(
            "{na} and {nb} have a many:many relationship ({b_max}:{a_max})"
        )),
    };

    let rows = pairs
        .into_iter()
        .map(|(va, vb, count)| {
            vec![
                Inline::value(na, va),
                Inline::value(nb, vb),
                Inline::text(fmt_num(count as f64)),
            ]
        })
        .collect();

    outcome
        .with_metric("max_per_first", a_max as f64)
        .with_metric("max_per_second", b_max as f64)
        .with_block(Block::Table {
            header: vec![
                Inline::Column(na.to_owned()),
                Inline::Column(nb.to_owned()),
                Inline::text("row_count"),
            ],
            rows,
            highlight: None,
        })
}
