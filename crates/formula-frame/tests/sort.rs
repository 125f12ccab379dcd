use chrono::{NaiveDate, NaiveDateTime};
use formula_frame::{
    sort_pass, sort_permutation, Container, ElementKind, ErrorCategory, FrameError, SortSpec,
    Table, Values,
};
use pretty_assertions::assert_eq;

fn records(nums: Vec<f64>, texts: Vec<&str>) -> Table {
    Table::new(vec![
        Container::new(nums).with_name("n"),
        Container::new(texts).with_name("s"),
    ])
    .unwrap()
}

fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 5, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn single_key_sort_is_stable() {
    let mut table = records(vec![1.0, 1.0], vec!["b", "a"]);
    table.sort_by(&[SortSpec::asc("n")]).unwrap();
    assert_eq!(table.column("s").unwrap().values(), &Values::from(vec!["b", "a"]));
}

#[test]
fn multi_key_sort_is_lexicographic() {
    let mut table = records(vec![10.0, 2.0, 2.0, 1.0], vec!["d", "b", "c", "a"]);
    table
        .sort_by(&[SortSpec::asc("n"), SortSpec::desc("s")])
        .unwrap();

    assert_eq!(
        table.column("n").unwrap().values(),
        &Values::Numeric(vec![1.0, 2.0, 2.0, 10.0])
    );
    assert_eq!(
        table.column("s").unwrap().values(),
        &Values::from(vec!["a", "c", "b", "d"])
    );
}

#[test]
fn descending_does_not_reverse_lower_priority_ties() {
    let table = records(vec![1.0, 2.0, 1.0, 2.0], vec!["x", "y", "z", "w"]);
    let refs: Vec<&Container> = table.columns().iter().collect();
    let permutation = sort_permutation(&refs, &[SortSpec::desc("n")]).unwrap();
    assert_eq!(permutation, vec![1, 3, 0, 2]);
}

#[test]
fn numeric_comparison_is_by_value_not_text() {
    let table = records(vec![10.0, 9.0, 100.0], vec!["a", "b", "c"]);
    let refs: Vec<&Container> = table.columns().iter().collect();
    assert_eq!(
        sort_permutation(&refs, &[SortSpec::asc("n")]).unwrap(),
        vec![1, 0, 2]
    );
    assert_eq!(
        sort_permutation(&refs, &[SortSpec::asc("n").with_hint(ElementKind::Text)]).unwrap(),
        vec![0, 2, 1]
    );
}

#[test]
fn text_sorts_by_code_point() {
    let c = Container::new(vec!["b", "B", "a", "é"]).with_name("t");
    assert_eq!(
        sort_permutation(&[&c], &[SortSpec::asc("t")]).unwrap(),
        vec![1, 2, 0, 3]
    );
}

#[test]
fn chronological_sorts_by_instant() {
    let c = Container::new(vec![day(3), day(1), day(2)]).with_name("t");
    assert_eq!(
        sort_permutation(&[&c], &[SortSpec::desc("t")]).unwrap(),
        vec![0, 2, 1]
    );

    let text = Container::new(vec!["05/03/2023", "2023-05-01"]).with_name("t");
    assert_eq!(
        sort_permutation(&[&text], &[SortSpec::asc("t").with_hint(ElementKind::Chronological)])
            .unwrap(),
        vec![1, 0]
    );
}

#[test]
fn nulls_sort_as_their_stored_zero() {
    let c = Container::new(vec![5.0, f64::NAN, -1.0]).with_name("n");
    assert_eq!(
        sort_permutation(&[&c], &[SortSpec::asc("n")]).unwrap(),
        vec![2, 1, 0]
    );
}

#[test]
fn sorting_keeps_columns_aligned_and_content_unchanged() {
    let mut table = records(vec![3.0, f64::NAN, 1.0], vec!["c", "n/a", "a"]);
    table.sort_by(&[SortSpec::asc("s")]).unwrap();
    let s = table.column("s").unwrap();
    let n = table.column("n").unwrap();
    assert_eq!(s.null_mask().to_bools(), vec![true, false, false]);
    assert_eq!(n.null_mask().to_bools(), vec![true, false, false]);
    assert_eq!(n.as_numeric().values, vec![0.0, 1.0, 3.0]);
}

#[test]
fn unknown_columns_and_mismatched_lengths_are_errors() {
    let table = records(vec![1.0], vec!["a"]);
    let refs: Vec<&Container> = table.columns().iter().collect();
    let err = sort_permutation(&refs, &[SortSpec::asc("missing")]).unwrap_err();
    assert_eq!(err, FrameError::UnknownColumn("missing".to_owned()));
    assert_eq!(err.category(), ErrorCategory::Reference);

    let a = Container::new(vec![1.0, 2.0]).with_name("a");
    let b = Container::new(vec![1.0]).with_name("b");
    let err = sort_permutation(&[&a, &b], &[SortSpec::asc("b")]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[test]
fn permutation_applies_to_a_standalone_container() {
    let mut c = Container::new(vec!["z", "y", "x"]).with_name("c");
    let permutation = sort_permutation(&[&c], &[SortSpec::asc("c")]).unwrap();
    c.apply_permutation(&permutation).unwrap();
    assert_eq!(c.values(), &Values::from(vec!["x", "y", "z"]));
}

#[test]
fn empty_spec_list_is_identity() {
    let c = Container::new(vec![2.0, 1.0]).with_name("c");
    assert_eq!(sort_permutation(&[&c], &[]).unwrap(), vec![0, 1]);
}

#[test]
fn sort_pass_rejects_out_of_range_positions() {
    let c = Container::new(vec![1.0, 2.0]);
    let mut permutation = vec![0, 5];
    let err = sort_pass(&mut permutation, &c, ElementKind::Numeric, false).unwrap_err();
    assert_eq!(err, FrameError::RowOutOfBounds { row: 5, len: 2 });
    assert_eq!(err.category(), ErrorCategory::Reference);
    assert_eq!(permutation, vec![0, 5]);

    let mut permutation = vec![1, 0];
    sort_pass(&mut permutation, &c, ElementKind::Numeric, true).unwrap();
    assert_eq!(permutation, vec![1, 0]);
}
