use chrono::NaiveDate;
use polars::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_core::data::DataLoader;
use sales_core::{
    CanonicalRecord, MemoryReporter, Month, Normalizer, PipelineEvent, RawBatch, SalesError,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn normalizer() -> (Normalizer, Arc<MemoryReporter>) {
    let reporter = Arc::new(MemoryReporter::new());
    (Normalizer::new(reporter.clone()), reporter)
}

fn date(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[test]
fn test_repairs_every_field() {
    let df = df!(
        "Mes" => &[Some("Fevreiro"), Some("maio"), Some("Xyz"), None],
        "Ano" => &[2023i64, 2023, 2022, 2021],
        "Vendas" => &[Some("100"), Some("-5"), Some("abc"), None],
        "Publicidade" => &[Some(1.0), Some(5.0), None, Some(1.0)]
    )
    .unwrap();
    let (normalizer, reporter) = normalizer();

    let table = normalizer.normalize(&RawBatch::from_dataframe(df)).unwrap();

    assert_eq!(
        table.records(),
        &[
            CanonicalRecord {
                mes: Month::Fevereiro,
                ano: Some(2023),
                vendas: 100,
                publicidade: 1,
                data: date(2023, 2),
            },
            CanonicalRecord {
                mes: Month::Maio,
                ano: Some(2023),
                vendas: 0,
                publicidade: 0,
                data: date(2023, 5),
            },
            CanonicalRecord {
                mes: Month::Janeiro,
                ano: Some(2022),
                vendas: 0,
                publicidade: 0,
                data: date(2022, 1),
            },
            CanonicalRecord {
                mes: Month::Janeiro,
                ano: Some(2021),
                vendas: 0,
                publicidade: 1,
                data: date(2021, 1),
            },
        ]
    );

    assert_eq!(
        reporter.events(),
        vec![
            PipelineEvent::InvalidMonths {
                count: 2,
                fallback: "Janeiro"
            },
            PipelineEvent::SalesCoerced { count: 2 },
            PipelineEvent::SalesClamped { count: 1 },
            PipelineEvent::RowsProcessed { count: 4 },
        ]
    );
}

#[test]
fn test_missing_sales_column_is_a_schema_error() {
    let df = df!(
        "Mes" => &["Maio"],
        "Ano" => &[2023i64]
    )
    .unwrap();
    let (normalizer, reporter) = normalizer();

    let result = normalizer.normalize(&RawBatch::from_dataframe(df));

    match result {
        Err(SalesError::Schema(column)) => assert_eq!(column, "Vendas"),
        other => panic!("Expected schema error, got {:?}", other),
    }
    assert!(reporter.events().is_empty());
}

#[rstest]
#[case("Mes")]
#[case("Ano")]
#[case("Vendas")]
fn test_each_required_column_is_enforced(#[case] dropped: &str) {
    let df = df!(
        "Mes" => &["Maio"],
        "Ano" => &[2023i64],
        "Vendas" => &[10i64]
    )
    .unwrap()
    .drop(dropped)
    .unwrap();
    let (normalizer, _) = normalizer();

    let result = normalizer.normalize(&RawBatch::from_dataframe(df));
    assert!(matches!(result, Err(SalesError::Schema(c)) if c == dropped));
}

#[test]
fn test_missing_advertising_column_defaults_to_zero() {
    let df = df!(
        "Mes" => &["Junho", "Julho"],
        "Ano" => &[2020i64, 2020],
        "Vendas" => &[10i64, 20]
    )
    .unwrap();
    let (normalizer, _) = normalizer();

    let table = normalizer.normalize(&RawBatch::from_dataframe(df)).unwrap();
    assert!(table.iter().all(|r| r.publicidade == 0));
}

#[rstest]
#[case(1.0, 1)]
#[case(5.0, 0)]
#[case(0.0, 0)]
#[case(-1.0, 0)]
#[case(0.99, 0)]
fn test_advertising_flag_is_zero_or_one(#[case] raw: f64, #[case] expected: u8) {
    let df = df!(
        "Mes" => &["Abril"],
        "Ano" => &[2022i64],
        "Vendas" => &[1i64],
        "Publicidade" => &[raw]
    )
    .unwrap();
    let (normalizer, _) = normalizer();

    let table = normalizer.normalize(&RawBatch::from_dataframe(df)).unwrap();
    assert_eq!(table.records()[0].publicidade, expected);
}

#[rstest]
#[case(-250.0, 0)]
#[case(0.0, 0)]
#[case(42.0, 42)]
#[case(10.9, 10)]
fn test_sales_are_never_negative(#[case] raw: f64, #[case] expected: u64) {
    let df = df!(
        "Mes" => &["Abril"],
        "Ano" => &[2022i64],
        "Vendas" => &[raw]
    )
    .unwrap();
    let (normalizer, _) = normalizer();

    let table = normalizer.normalize(&RawBatch::from_dataframe(df)).unwrap();
    assert_eq!(table.records()[0].vendas, expected);
}

#[test]
fn test_unbuildable_dates_stay_empty_for_that_row_only() {
    let df = df!(
        "Mes" => &["Março", "Março", "Março"],
        "Ano" => &["2023", "abc", "99999"],
        "Vendas" => &[1i64, 2, 3]
    )
    .unwrap();
    let (normalizer, reporter) = normalizer();

    let table = normalizer.normalize(&RawBatch::from_dataframe(df)).unwrap();
    let records = table.records();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].data, date(2023, 3));
    assert_eq!(records[1].ano, None);
    assert_eq!(records[1].data, None);
    assert_eq!(records[2].ano, Some(99999));
    assert_eq!(records[2].data, None);

    assert!(reporter
        .warnings()
        .contains(&PipelineEvent::DateSynthesisFailed { count: 2 }));
}

#[test]
fn test_clean_batch_reports_only_row_count() {
    let df = df!(
        "Mes" => &["Dezembro"],
        "Ano" => &[2019i64],
        "Vendas" => &[300i64],
        "Publicidade" => &[0i64]
    )
    .unwrap();
    let (normalizer, reporter) = normalizer();

    normalizer.normalize(&RawBatch::from_dataframe(df)).unwrap();
    assert_eq!(
        reporter.events(),
        vec![PipelineEvent::RowsProcessed { count: 1 }]
    );
}

#[test]
fn test_normalizes_raw_csv_export() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Id,Mes,Ano,Vendas,Publicidade").unwrap();
    writeln!(file, "1,Janiero,2021,120,1").unwrap();
    writeln!(file, "2,Outbro,2021,,0").unwrap();
    writeln!(file, "3,Setembro,2022,95.5,").unwrap();

    let batch = DataLoader::from_csv(file.path()).unwrap();
    assert_eq!(batch.len(), 3);
    assert!(batch.has_column("Id"));

    let (normalizer, _) = normalizer();
    let table = normalizer.normalize(&batch).unwrap();
    let months: Vec<Month> = table.iter().map(|r| r.mes).collect();
    let sales: Vec<u64> = table.iter().map(|r| r.vendas).collect();

    assert_eq!(months, vec![Month::Janeiro, Month::Outubro, Month::Setembro]);
    assert_eq!(sales, vec![120, 0, 95]);
    assert_eq!(table.records()[0].publicidade, 1);
    assert_eq!(table.records()[2].publicidade, 0);
}

#[test]
fn test_empty_batch_yields_empty_table() {
    let df = df!(
        "Mes" => Vec::<String>::new(),
        "Ano" => Vec::<i64>::new(),
        "Vendas" => Vec::<i64>::new()
    )
    .unwrap();
    let (normalizer, reporter) = normalizer();

    let table = normalizer.normalize(&RawBatch::from_dataframe(df)).unwrap();
    assert!(table.is_empty());
    assert_eq!(
        reporter.events(),
        vec![PipelineEvent::RowsProcessed { count: 0 }]
    );
}

#[test]
fn test_padded_numeric_text_is_parsed() {
    let df = df!(
        "Mes" => &[" Maio ", "Junho"],
        "Ano" => &[" 2023", "2023 "],
        "Vendas" => &[" 12 ", "\t7"],
        "Publicidade" => &[" 1", "0 "]
    )
    .unwrap();
    let (normalizer, reporter) = normalizer();

    let table = normalizer.normalize(&RawBatch::from_dataframe(df)).unwrap();

    assert_eq!(
        table.records(),
        &[
            CanonicalRecord {
                mes: Month::Maio,
                ano: Some(2023),
                vendas: 12,
                publicidade: 1,
                data: date(2023, 5),
            },
            CanonicalRecord {
                mes: Month::Junho,
                ano: Some(2023),
                vendas: 7,
                publicidade: 0,
                data: date(2023, 6),
            },
        ]
    );
    assert!(reporter.warnings().is_empty());
}
