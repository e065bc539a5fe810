//! XPath-subset to CSS selector translation.
//!
//! This is a syntactic rewrite, not an XPath parser. Only child and descendant steps,
//! positional predicates, attribute tests, `contains()` and `name()` are understood;
//! anything else passes through in an unspecified shape.

use once_cell::sync::Lazy;
use regex::Regex;

static POSITIONAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\d+)\]").expect("valid pattern"));
static CONTAINS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[contains\((.*?),\s*'(.*?)'\)\]").expect("valid pattern"));
static NAME_TEST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[name\(\)='(.*?)'\]").expect("valid pattern"));
static PREDICATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").expect("valid pattern"));

type Stage = fn(&str) -> String;

/// Applied in order; later stages assume slashes and brackets were normalised by earlier ones.
const STAGES: &[(&str, Stage)] = &[
    ("descendant", descendant_steps),
    ("child", child_steps),
    ("position", positional_predicates),
    ("attribute", attribute_axis),
    ("contains", contains_predicates),
    ("name", name_predicates),
    ("predicate", remaining_predicates),
];

pub fn xpath_to_css(xpath: &str) -> String {
    let css = STAGES.iter().fold(xpath.to_string(), |acc, (stage, rewrite)| {
        let next = rewrite(&acc);
        if next != acc {
            tracing::trace!(stage, from = %acc, to = %next, "selector rewrite");
        }
        next
    });
    css.trim().to_string()
}

fn descendant_steps(s: &str) -> String {
    s.replace("//", " ")
}

fn child_steps(s: &str) -> String {
    s.replace('/', " > ")
}

fn positional_predicates(s: &str) -> String {
    POSITIONAL.replace_all(s, ":nth-of-type(${1})").into_owned()
}

fn attribute_axis(s: &str) -> String {
    s.replace('@', "")
}

fn contains_predicates(s: &str) -> String {
    CONTAINS.replace_all(s, "[${1}*='${2}']").into_owned()
}

fn name_predicates(s: &str) -> String {
    NAME_TEST.replace_all(s, "${1}").into_owned()
}

fn remaining_predicates(s: &str) -> String {
    PREDICATE
        .replace_all(s, |caps: &regex::Captures<'_>| format!("[{}]", caps[1].trim()))
        .into_owned()
}
