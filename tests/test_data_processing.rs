//! Integration test: loading, cleaning, splitting

use palmerml::data::{drop_missing_target, train_test_split, DatasetLoader};
use std::io::Write;
use tempfile::NamedTempFile;

fn penguins_csv() -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    writeln!(
        file,
        "species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year"
    )
    .unwrap();
    writeln!(file, "Adelie,Torgersen,39.1,18.7,181,3750,male,2007").unwrap();
    writeln!(file, "Adelie,Torgersen,39.5,17.4,186,3800,female,2007").unwrap();
    writeln!(file, "Adelie,Torgersen,NA,NA,NA,NA,NA,2007").unwrap();
    writeln!(file, "Gentoo,Biscoe,46.1,13.2,211,4500,female,2008").unwrap();
    writeln!(file, "Gentoo,Biscoe,50.0,16.3,230,5700,male,2008").unwrap();
    writeln!(file, "Chinstrap,Dream,46.5,17.9,192,3500,female,2009").unwrap();
    writeln!(file, "Chinstrap,Dream,50.0,19.5,196,3900,male,2009").unwrap();
    file
}

#[test]
fn test_load_and_clean() {
    let file = penguins_csv();
    let df = DatasetLoader::new()
        .load_csv(file.path().to_str().unwrap())
        .unwrap();

    assert_eq!(df.height(), 7);
    assert_eq!(df.width(), 8);
    assert_eq!(df.column("sex").unwrap().null_count(), 1);

    let cleaned = drop_missing_target(&df, "sex").unwrap();
    assert_eq!(cleaned.height(), 6);
    assert_eq!(cleaned.column("sex").unwrap().null_count(), 0);
}

fn balanced_frame(n_per_class: usize) -> polars::prelude::DataFrame {
    use polars::prelude::*;

    let mut mass = Vec::new();
    let mut sex = Vec::new();
    for i in 0..n_per_class * 2 {
        mass.push(3500.0 + (i as f64) * 10.0);
        sex.push(if i % 2 == 0 { "male" } else { "female" });
    }
    df!("body_mass_g" => &mass, "sex" => &sex).unwrap()
}

#[test]
fn test_split_proportions_within_tolerance() {
    let df = balanced_frame(100);
    let split = train_test_split(&df, "sex", 0.25, 2435).unwrap();

    // full dataset is 50% male; both sides must stay within 5 points
    let male_fraction = |ys: &ndarray::Array1<f64>| {
        ys.iter().filter(|&&y| y == 1.0).count() as f64 / ys.len() as f64
    };
    assert!((male_fraction(&split.y_train) - 0.5).abs() <= 0.05);
    assert!((male_fraction(&split.y_test) - 0.5).abs() <= 0.05);

    // 25% of 200 rows
    assert_eq!(split.test.height(), 50);
    assert_eq!(split.train.height(), 150);
}

#[test]
fn test_split_deterministic_across_runs() {
    let df = balanced_frame(60);

    let a = train_test_split(&df, "sex", 0.25, 2435).unwrap();
    let b = train_test_split(&df, "sex", 0.25, 2435).unwrap();

    assert_eq!(a.train_indices, b.train_indices);
    assert_eq!(a.test_indices, b.test_indices);
    assert_eq!(a.y_train, b.y_train);
}

#[test]
fn test_split_feature_label_correspondence() {
    use polars::prelude::*;

    // id column mirrors the row index so rows can be traced through the split
    let n = 80;
    let ids: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let sex: Vec<&str> = (0..n).map(|i| if i % 2 == 0 { "male" } else { "female" }).collect();
    let df = df!("id" => &ids, "sex" => &sex).unwrap();

    let split = train_test_split(&df, "sex", 0.25, 99).unwrap();

    let id_col = split.train.column("id").unwrap().f64().unwrap();
    for (row, (&source_idx, &label)) in split
        .train_indices
        .iter()
        .zip(split.y_train.iter())
        .enumerate()
    {
        assert_eq!(id_col.get(row).unwrap(), source_idx as f64);
        let expected = if source_idx % 2 == 0 { 1.0 } else { 0.0 };
        assert_eq!(label, expected);
    }
}
