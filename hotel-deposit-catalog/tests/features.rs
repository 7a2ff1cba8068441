use hotel_deposit_catalog::*;

#[derive(Debug, Clone, PartialEq)]
struct Row {
    name: &'static str,
    amount: Option<&'static str>,
    pct: bool,
}

impl DepositRecord for Row {
    fn deposit_amount(&self) -> Option<f64> {
        self.amount.and_then(parse_amount)
    }

    fn is_percentage(&self) -> bool {
        self.pct
    }
}

fn fixed(name: &'static str, amount: &'static str) -> Row {
    Row {
        name,
        amount: Some(amount),
        pct: false,
    }
}

fn pct(name: &'static str, amount: &'static str) -> Row {
    Row {
        name,
        amount: Some(amount),
        pct: true,
    }
}

fn names(rows: &[Row]) -> Vec<&'static str> {
    rows.iter().map(|r| r.name).collect()
}

#[test]
fn amount_range_filter_keeps_middle_value() {
    let rows = vec![fixed("a", "50"), fixed("b", "100"), fixed("c", "150")];
    let filtered = filter_by_deposit_amount(&rows, Some(75.0), Some(125.0));
    assert_eq!(names(&filtered), vec!["b"]);
}

#[test]
fn amount_filter_excludes_percentages_and_garbage() {
    let rows = vec![
        fixed("a", "100"),
        pct("b", "100"),
        fixed("c", "n/a"),
        Row {
            name: "d",
            amount: None,
            pct: false,
        },
    ];
    let filtered = filter_by_deposit_amount(&rows, Some(0.0), None);
    assert_eq!(names(&filtered), vec!["a"]);
}

#[test]
fn open_bounds_return_everything() {
    let rows = vec![fixed("a", "50"), pct("b", "10")];
    assert_eq!(filter_by_deposit_amount(&rows, None, None), rows);
    assert_eq!(filter_by_deposit_percentage(&rows, None, None), rows);
}

#[test]
fn percentage_filter_is_disjoint_from_fixed() {
    let rows = vec![fixed("a", "15"), pct("b", "15"), pct("c", "30")];
    let filtered = filter_by_deposit_percentage(&rows, Some(10.0), Some(20.0));
    assert_eq!(names(&filtered), vec!["b"]);
}

#[test]
fn top_brands_sorted_and_limited() {
    let brands = vec![
        BrandSummary {
            id: 1,
            brand_name: "Hilton".to_string(),
            hotel_count: 3,
        },
        BrandSummary {
            id: 2,
            brand_name: "Marriott".to_string(),
            hotel_count: 7,
        },
        BrandSummary {
            id: 3,
            brand_name: "Hyatt".to_string(),
            hotel_count: 5,
        },
    ];
    let top = top_brands_by_hotel_count(&brands, 2);
    let top_names: Vec<&str> = top.iter().map(|b| b.brand_name.as_str()).collect();
    assert_eq!(top_names, vec!["Marriott", "Hyatt"]);
}

#[test]
fn average_uses_fixed_deposits_only() {
    let rows = vec![fixed("a", "100"), fixed("b", "200"), pct("c", "50")];
    assert_eq!(average_deposit(&rows), 150.0);
    assert_eq!(average_deposit::<Row>(&[]), 0.0);
}

#[test]
fn sort_treats_unparseable_as_zero() {
    let rows = vec![fixed("a", "75"), fixed("b", "junk"), fixed("c", "25")];
    assert_eq!(names(&sort_by_deposit_amount(&rows, true)), vec!["b", "c", "a"]);
    assert_eq!(names(&sort_by_deposit_amount(&rows, false)), vec!["a", "c", "b"]);
}

#[test]
fn stats_on_empty_input_are_zero() {
    let stats = deposit_stats::<Row>(&[]);
    assert_eq!(
        stats,
        DepositStats {
            total: 0,
            fixed_count: 0,
            percentage_count: 0,
            min: 0.0,
            max: 0.0,
            avg: 0.0,
        }
    );
}

#[test]
fn stats_bundle() {
    let rows = vec![
        fixed("a", "50"),
        fixed("b", "150"),
        pct("c", "20"),
        Row {
            name: "d",
            amount: None,
            pct: false,
        },
    ];
    let stats = deposit_stats(&rows);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.fixed_count, 2);
    assert_eq!(stats.percentage_count, 1);
    assert_eq!(stats.min, 50.0);
    assert_eq!(stats.max, 150.0);
    assert_eq!(stats.avg, 100.0);
}

#[test]
fn raw_value_coercions() {
    assert_eq!(RawValue::Text(" 12.5 ".to_string()).as_f64(), Some(12.5));
    assert_eq!(RawValue::Text("abc".to_string()).as_f64(), None);
    assert_eq!(RawValue::Text("3 nights".to_string()).as_i64(), Some(3));
    assert_eq!(RawValue::Text("nights".to_string()).as_i64(), None);
    assert_eq!(RawValue::Float(2.9).as_i64(), Some(2));
    assert_eq!(RawValue::Integer(4).as_f64(), Some(4.0));
}
