use formula_frame::{
    Container, ErrorCategory, FrameConfig, FrameError, Pipeline, SortSpec, Table, Values,
};
use pretty_assertions::assert_eq;

fn table() -> Table {
    Table::new(vec![
        Container::new(vec!["b", "a", "b"]).with_name("k"),
        Container::new(vec![1.0, 2.0, 3.0]).with_name("v"),
    ])
    .unwrap()
}

#[test]
fn successful_chain_returns_final_value() {
    let sums = Pipeline::new(table())
        .then(|t| t.sort_by(&[SortSpec::asc("k")]))
        .then(|t| t.subset(&[0, 1]))
        .map(|t| {
            let grouped = t.group_by(&["k"], &FrameConfig::default())?;
            grouped.sum(t.column("v")?)
        })
        .finish()
        .unwrap();

    assert_eq!(sums.values(), &Values::Numeric(vec![2.0, 1.0]));
}

#[test]
fn first_error_short_circuits_later_steps() {
    let mut later_ran = false;
    let pipeline = Pipeline::new(table())
        .then(|t| t.sort_by(&[SortSpec::asc("missing")]))
        .then(|t| {
            later_ran = true;
            t.subset(&[0])
        });

    assert!(pipeline.is_err());
    assert_eq!(
        pipeline.error(),
        Some(&FrameError::UnknownColumn("missing".to_owned()))
    );
    let err = pipeline.finish().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Reference);
    assert!(!later_ran);
}

#[test]
fn errors_from_constructors_enter_the_chain() {
    let mismatched = Table::new(vec![
        Container::new(vec![1.0]).with_name("a"),
        Container::new(vec![1.0, 2.0]).with_name("b"),
    ]);
    let err = Pipeline::from(mismatched)
        .then(|t| t.subset(&[0]))
        .finish()
        .unwrap_err();
    assert!(matches!(err, FrameError::LengthMismatch { .. }));
}

#[test]
fn unnamed_columns_are_named_by_position() {
    let t = Table::new(vec![Container::new(vec![1.0]), Container::new(vec!["x"])]).unwrap();
    assert_eq!(t.column_names(), vec!["0", "1"]);
    assert_eq!(t.column_count(), 2);
    assert_eq!(t.row_count(), 1);
}

#[test]
fn positional_names_skip_names_already_taken() {
    let t = Table::new(vec![
        Container::new(vec![1.0]).with_name("1"),
        Container::new(vec![2.0]),
        Container::new(vec![3.0]),
    ])
    .unwrap();
    assert_eq!(t.column_names(), vec!["1", "2", "3"]);
    assert_eq!(t.column("2").unwrap().values(), &Values::from(vec![2.0]));
}

#[test]
fn table_copy_is_independent() {
    let original = table();
    let mut copy = original.copy();
    copy.subset(&[2]).unwrap();
    assert_eq!(original.row_count(), 3);
    assert_eq!(copy.row_count(), 1);
    copy.column_mut("v").unwrap().cast(formula_frame::ElementKind::Text);
    assert_eq!(
        original.column("v").unwrap().values(),
        &Values::Numeric(vec![1.0, 2.0, 3.0])
    );
}
