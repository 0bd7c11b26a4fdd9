use std::io::{Read, Write};
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Labeled examples: `features` is (features x examples), `labels[j]`
/// belongs to column `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub name: String,
    /// Feature column names, in row order of `features`.
    pub columns: Vec<String>,
    pub features: Matrix,
    pub labels: Vec<f64>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, columns: Vec<String>, features: Matrix, labels: Vec<f64>) -> Result<Dataset> {
        if features.cols != labels.len() {
            return Err(NnError::shape("Dataset", format!("{} labels", features.cols), labels.len()));
        }
        if columns.len() != features.rows {
            return Err(NnError::shape("Dataset columns", features.rows, columns.len()));
        }
        Ok(Dataset { name: name.into(), columns, features, labels })
    }

    /// Reads a CSV file with a header row. The first `feature_count`
    /// columns are features and the last column is the label. The dataset
    /// is named after the file stem.
    pub fn from_csv(path: impl AsRef<Path>, feature_count: usize) -> Result<Dataset> {
        let path = path.as_ref();
        let name = path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        let file = std::fs::File::open(path)?;
        Dataset::from_csv_reader(name, file, feature_count)
    }

    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R, feature_count: usize) -> Result<Dataset> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        if feature_count == 0 || headers.len() < feature_count + 1 {
            return Err(NnError::Dataset(format!(
                "expected {} feature columns plus a label column, header has {} columns",
                feature_count,
                headers.len()
            )));
        }
        let columns: Vec<String> = headers.iter().take(feature_count).map(str::to_string).collect();

        let mut examples = Vec::new();
        let mut labels = Vec::new();
        for (row_idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            if record.len() != headers.len() {
                return Err(NnError::Dataset(format!(
                    "row {}: {} cells, header has {}",
                    row_idx + 1,
                    record.len(),
                    headers.len()
                )));
            }
            let values = record.iter()
                .map(|cell| {
                    cell.trim().parse::<f64>().map_err(|_| {
                        NnError::Dataset(format!("row {}: '{}' is not a number", row_idx + 1, cell))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            examples.push(values[..feature_count].to_vec());
            labels.push(values[values.len() - 1]);
        }

        if examples.is_empty() {
            return Err(NnError::Dataset("no data rows".into()));
        }

        let features = Matrix::from_examples(&examples)?;
        Dataset::new(name, columns, features, labels)
    }

    /// Writes the header (feature columns then `label_column`) and one row
    /// per example.
    pub fn to_csv(&self, path: impl AsRef<Path>, label_column: &str) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.to_csv_writer(file, label_column)
    }

    pub fn to_csv_writer<W: Write>(&self, writer: W, label_column: &str) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut header = self.columns.clone();
        header.push(label_column.to_string());
        csv_writer.write_record(&header)?;

        for (j, label) in self.labels.iter().enumerate() {
            let mut row: Vec<String> = self.features.data.iter().map(|r| r[j].to_string()).collect();
            row.push(label.to_string());
            csv_writer.write_record(&row)?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.features.rows
    }

    /// Labels as a (1 x examples) row, the shape a single-unit output produces.
    pub fn label_row(&self) -> Matrix {
        Matrix::row(&self.labels)
    }

    /// Sub-dataset of the given example indices, in that order.
    pub fn select(&self, indices: &[usize]) -> Result<Dataset> {
        let features = self.features.select_columns(indices)?;
        let labels = indices.iter().map(|&i| self.labels[i]).collect();
        Ok(Dataset {
            name: self.name.clone(),
            columns: self.columns.clone(),
            features,
            labels,
        })
    }

    /// Reproducible random train/test partition. `test_fraction` of the
    /// examples (rounded) go to the test set; both sides must be non-empty.
    pub fn split(&self, test_fraction: f64, seed: u64) -> Result<(Dataset, Dataset)> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(NnError::InvalidConfig(format!(
                "test fraction must lie in (0, 1), got {test_fraction}"
            )));
        }
        let n = self.len();
        let test_count = (n as f64 * test_fraction).round() as usize;
        if test_count == 0 {
            return Err(NnError::EmptyPartition("test"));
        }
        if test_count >= n {
            return Err(NnError::EmptyPartition("train"));
        }

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut StdRng::seed_from_u64(seed));
        let (test_idx, train_idx) = indices.split_at(test_count);

        Ok((self.select(train_idx)?, self.select(test_idx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "a,b,label\n0,1,1\n1,0,1\n0,0,0\n1,1,0\n0.5,0.5,1\n";

    #[test]
    fn reads_features_and_last_column_label() {
        let ds = Dataset::from_csv_reader("toy", CSV.as_bytes(), 2).unwrap();
        assert_eq!(ds.len(), 5);
        assert_eq!(ds.columns, vec!["a", "b"]);
        assert_eq!(ds.features.shape(), (2, 5));
        assert_eq!(ds.features.data[1], vec![1.0, 0.0, 0.0, 1.0, 0.5]);
        assert_eq!(ds.labels, vec![1.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_non_numeric_cells_and_empty_files() {
        let bad = "a,label\nx,1\n";
        assert!(matches!(Dataset::from_csv_reader("bad", bad.as_bytes(), 1), Err(NnError::Dataset(_))));
        assert!(Dataset::from_csv_reader("empty", "a,label\n".as_bytes(), 1).is_err());
        assert!(Dataset::from_csv_reader("narrow", CSV.as_bytes(), 3).is_err());
    }

    #[test]
    fn split_is_reproducible_and_disjoint() {
        let ds = Dataset::from_csv_reader("toy", CSV.as_bytes(), 2).unwrap();
        let (train_a, test_a) = ds.split(0.4, 11).unwrap();
        let (train_b, test_b) = ds.split(0.4, 11).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(train_a.len(), 3);
        assert_eq!(test_a.len(), 2);

        let mut firsts: Vec<f64> = train_a.features.data[0].iter()
            .chain(test_a.features.data[0].iter())
            .copied()
            .collect();
        firsts.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(firsts, vec![0.0, 0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn csv_output_reads_back() {
        let ds = Dataset::from_csv_reader("toy", CSV.as_bytes(), 2).unwrap();
        let mut buffer = Vec::new();
        ds.to_csv_writer(&mut buffer, "label").unwrap();
        assert!(String::from_utf8(buffer.clone()).unwrap().starts_with("a,b,label\n"));
        assert_eq!(Dataset::from_csv_reader("toy", buffer.as_slice(), 2).unwrap(), ds);
    }

    #[test]
    fn split_rejects_degenerate_partitions() {
        let ds = Dataset::from_csv_reader("toy", CSV.as_bytes(), 2).unwrap();
        assert!(matches!(ds.split(0.01, 1), Err(NnError::EmptyPartition("test"))));
        assert!(matches!(ds.split(0.99, 1), Err(NnError::EmptyPartition("train"))));
        assert!(ds.split(1.5, 1).is_err());
    }
}
