//! Mana cost parsing: converted-mana-value formula and color extraction.
//!
//! Two forms of each function are provided. The scalar form mirrors
//! `the-muppet-mtgjson`'s `set_builder::get_card_cmc`/`get_card_colors` and is
//! used wherever a single mana-cost string needs to be evaluated outside the
//! lazy plan (writers, manual overrides, tests). The columnar `Expr` form is
//! what Stage 2 of the pipeline actually runs: it tokenizes the whole
//! `manaCost` column at once via `str().extract_all` + `list().eval`, never a
//! per-row scalar loop, which is the pipeline's hard constraint: pure
//! columnar expressions, no per-row scalar loops.

use polars::prelude::*;
use std::sync::OnceLock;

fn symbol_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"\{([^}]*)\}").unwrap())
}

/// Canonical color order: W, U, B, R, G. Anything else sorts after.
pub const COLOR_ORDER: [&str; 5] = ["W", "U", "B", "R", "G"];

fn color_rank(c: &str) -> usize {
    COLOR_ORDER.iter().position(|x| *x == c).unwrap_or(COLOR_ORDER.len())
}

/// Sort a color list into W→U→B→R→G order.
/// Never an alphabetic sort — `sort()` on the raw strings would put B before
/// G before R before U before W, which is wrong.
pub fn sort_colors(mut colors: Vec<String>) -> Vec<String> {
    colors.sort_by_key(|c| color_rank(c));
    colors.dedup();
    colors
}

/// Extract every color letter present in a mana cost string, deduplicated
/// and sorted W→U→B→R→G.
pub fn extract_colors(mana_cost: &str) -> Vec<String> {
    let mut found = Vec::new();
    for color in COLOR_ORDER {
        if mana_cost.contains(color) {
            found.push(color.to_string());
        }
    }
    found
}

fn symbol_value(symbol: &str) -> f64 {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return 0.0;
    }
    // Hybrid `{2/W}`: take the higher of the two options (2 here).
    if let Some((left, _right)) = symbol.split_once('/') {
        if let Ok(n) = left.parse::<f64>() {
            return n;
        }
        // Two-color hybrid like `{W/U}`: one colored pip either way.
        return 1.0;
    }
    if symbol == "X" || symbol == "Y" || symbol == "Z" {
        return 0.0;
    }
    if symbol == "½" || symbol.eq_ignore_ascii_case("h") {
        return 0.5;
    }
    if let Ok(n) = symbol.parse::<f64>() {
        return n;
    }
    // Anything else (W, U, B, R, G, C, S, P, ...) is one colored/generic pip.
    1.0
}

/// Scalar converted-mana-value parse of a single mana-cost string

pub fn parse_mana_value(mana_cost: &str) -> f64 {
    symbol_re()
        .captures_iter(mana_cost)
        .map(|cap| symbol_value(&cap[1]))
        .sum()
}

/// Per-atom numeric contribution, expressed as a `when`/`then` chain so it
/// composes inside a `list().eval(...)` without a row-wise closure. `atom`
/// is the element placeholder (`col("")`) inside the list context, still
/// wrapped in braces (e.g. `"{2/W}"`).
fn symbol_value_expr(atom: Expr) -> Expr {
    let trimmed = atom
        .str()
        .replace_all(lit("{"), lit(""), false)
        .str()
        .replace_all(lit("}"), lit(""), false);

    let before_slash = trimmed.clone().str().split(lit("/")).list().first();
    let before_slash_num = before_slash.cast(DataType::Float64);
    let as_num = trimmed.clone().cast(DataType::Float64);

    let is_hybrid = trimmed.clone().str().contains(lit("/"), false);
    let is_xyz = trimmed
        .clone()
        .eq(lit("X"))
        .or(trimmed.clone().eq(lit("Y")))
        .or(trimmed.clone().eq(lit("Z")));
    let is_half = trimmed
        .clone()
        .eq(lit("½"))
        .or(trimmed.clone().eq(lit("H")))
        .or(trimmed.eq(lit("h")));

    when(is_hybrid)
        .then(
            when(before_slash_num.clone().is_not_null())
                .then(before_slash_num)
                .otherwise(lit(1.0f64)),
        )
        .otherwise(
            when(is_xyz)
                .then(lit(0.0f64))
                .otherwise(
                    when(is_half)
                        .then(lit(0.5f64))
                        .otherwise(
                            when(as_num.clone().is_not_null())
                                .then(as_num)
                                .otherwise(lit(1.0f64)),
                        ),
                ),
        )
}

/// Build the columnar `manaValue` expression for Stage 2: tokenize `{...}`
/// atoms out of `mana_cost_col`, map each atom to its numeric contribution,
/// and sum the per-row list. Runs over the whole column as a single
/// vectorized plan node, never a per-row loop.
pub fn mana_value_expr(mana_cost_col: &str) -> Expr {
    let atoms = col(mana_cost_col)
        .fill_null(lit(""))
        .str()
        .extract_all(lit(r"\{[^}]*\}"));

    atoms
        .list()
        .eval(symbol_value_expr(col("")), true)
        .list()
        .sum()
        .alias("manaValue")
}

/// Columnar color extraction + W→U→B→R→G sort for Stage 2. Builds one
/// `when`/`then` arm per canonical color (fixed order, five arms), packs
/// them into a list, and drops the arms that didn't match.
pub fn colors_expr(mana_cost_col: &str) -> Expr {
    let base = col(mana_cost_col).fill_null(lit(""));
    let parts: Vec<Expr> = COLOR_ORDER
        .iter()
        .map(|color| {
            when(base.clone().str().contains(lit(*color), false))
                .then(lit(*color))
                .otherwise(lit(NULL))
        })
        .collect();

    concat_list(parts)
        .unwrap()
        .list()
        .drop_nulls()
        .alias("colors")
}

/// Scalar sibling of [`bracketed_colors_expr`]: every color letter found
/// inside a `{...}` symbol in `s`, bounded to the symbol's own contents so
/// prose doesn't false-positive (the "W" in "Whenever", the "R" in
/// "Return"), sorted W→U→B→R→G.
pub fn extract_bracketed_colors(s: &str) -> Vec<String> {
    let mut found = Vec::new();
    for cap in symbol_re().captures_iter(s) {
        let atom = &cap[1];
        for color in COLOR_ORDER {
            if atom.contains(color) && !found.iter().any(|c| c == color) {
                found.push(color.to_string());
            }
        }
    }
    sort_colors(found)
}

/// Columnar form of [`extract_bracketed_colors`]: extract every color
/// letter present inside a `{...}`-delimited symbol in `col_name`, bounding
/// each match to inside braces rather than the bare `colors_expr` substring
/// check. Needed wherever the scanned column is free-form prose (rules
/// text) rather than a pure mana-cost string: unbounded letter search would
/// pick up the first letter of "Whenever", "Return", "Goblin", etc. as a
/// false-positive color pip.
fn bracketed_colors_expr(col_name: &str) -> Expr {
    let base = col(col_name).fill_null(lit(""));
    let parts: Vec<Expr> = COLOR_ORDER
        .iter()
        .map(|color| {
            let pattern = format!(r"\{{[^}}]*{color}[^}}]*\}}");
            when(base.clone().str().contains(lit(pattern), false))
                .then(lit(*color))
                .otherwise(lit(NULL))
        })
        .collect();

    concat_list(parts).unwrap().list().drop_nulls()
}

/// Re-sorts an arbitrary color-letter list `Expr` into canonical W→U→B→R→G
/// order with duplicates dropped, the same five-arm `when`/`then` trick
/// `colors_expr` uses, but keyed off list membership instead of a raw
/// substring check so it composes on top of an already-built list column.
fn sort_color_list_to_wubrg(list_expr: Expr) -> Expr {
    let parts: Vec<Expr> = COLOR_ORDER
        .iter()
        .map(|color| {
            when(list_expr.clone().list().contains(lit(*color)))
                .then(lit(*color))
                .otherwise(lit(NULL))
        })
        .collect();
    concat_list(parts).unwrap().list().drop_nulls()
}

/// Columnar `colorIdentity` for Stage 2: the union of `colors` (mana-cost
/// pips), any color symbol printed in the card's own rules text (e.g. an
/// activated ability that taps for a color outside the casting cost), and
/// an explicit `colorIndicator` override, sorted W→U→B→R→G. `colors` is
/// always a subset of the result by construction, since the mana-cost
/// contribution is recomputed the same way `colors_expr` derives it.
pub fn color_identity_expr(mana_cost_col: &str, text_col: &str, color_indicator_col: &str) -> Expr {
    let mana_colors = bracketed_colors_expr(mana_cost_col);
    let text_colors = bracketed_colors_expr(text_col);
    let indicator = col(color_indicator_col).fill_null(lit(Series::new_empty("".into(), &DataType::String)));

    let union = concat_list([mana_colors, text_colors, indicator]).unwrap();
    sort_color_list_to_wubrg(union).alias("colorIdentity")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_generic() {
        assert_eq!(parse_mana_value("{3}"), 3.0);
    }

    #[test]
    fn generic_and_colored() {
        assert_eq!(parse_mana_value("{2}{W}{U}"), 4.0);
    }

    #[test]
    fn hybrid_takes_higher() {
        assert_eq!(parse_mana_value("{2/W}"), 2.0);
    }

    #[test]
    fn two_color_hybrid_is_one_pip() {
        assert_eq!(parse_mana_value("{W/U}"), 1.0);
    }

    #[test]
    fn x_is_zero() {
        assert_eq!(parse_mana_value("{X}{X}{R}"), 1.0);
    }

    #[test]
    fn half_mana() {
        assert_eq!(parse_mana_value("{½}{R}"), 1.5);
    }

    #[test]
    fn colors_are_sorted_wubrg() {
        assert_eq!(extract_colors("{G}{W}{B}"), vec!["W", "B", "G"]);
        assert_eq!(sort_colors(extract_colors("{G}{W}{B}")), vec!["W", "B", "G"]);
    }

    #[test]
    fn empty_cost_has_no_colors() {
        assert!(extract_colors("").is_empty());
        assert_eq!(parse_mana_value(""), 0.0);
    }

    #[test]
    fn bracketed_colors_reads_symbols_out_of_rules_text() {
        assert_eq!(
            extract_bracketed_colors("{T}: Add {R} or {G}."),
            vec!["R".to_string(), "G".to_string()]
        );
    }

    #[test]
    fn bracketed_colors_ignores_prose_that_starts_with_a_color_letter() {
        assert!(extract_bracketed_colors("Whenever a Goblin enters, Return it.").is_empty());
    }

    #[test]
    fn bracketed_colors_counts_hybrid_symbols_as_both_colors() {
        assert_eq!(extract_bracketed_colors("{R/W}"), vec!["W".to_string(), "R".to_string()]);
    }
}
