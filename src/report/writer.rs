use super::ReportId;
use crate::error::Result;
use crate::types::PopIdx;
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::Array2;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes report files into one output directory.
///
/// Floats use Rust's shortest round-trip formatting, so no precision is lost.
pub struct ReportWriter {
    output_dir: PathBuf,
    compress_matrices: bool,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, compress_matrices: bool) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            compress_matrices,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, report: ReportId) -> PathBuf {
        self.output_dir
            .join(report.file_name(self.compress_matrices))
    }

    fn create(&self, report: ReportId) -> Result<(PathBuf, ReportOut)> {
        let path = self.path_for(report);
        let file = BufWriter::new(File::create(&path)?);
        let out = if report.is_matrix() && self.compress_matrices {
            ReportOut::Gzip(GzEncoder::new(file, Compression::new(6)))
        } else {
            ReportOut::Plain(file)
        };
        Ok((path, out))
    }

    pub fn write_cellularity(&self, cellularity: f64) -> Result<PathBuf> {
        let (path, mut out) = self.create(ReportId::Cellularity)?;
        writeln!(out, "{}", cellularity)?;
        out.finish()?;
        Ok(path)
    }

    pub fn write_cluster_count(&self, cancer_pops: usize) -> Result<PathBuf> {
        let (path, mut out) = self.create(ReportId::ClusterCount)?;
        writeln!(out, "{}", cancer_pops)?;
        out.finish()?;
        Ok(path)
    }

    /// One `cluster\tnum_ssms\tphi` row per cluster, clusters numbered from 1.
    pub fn write_cluster_table(&self, counts: &[usize], phis: &[f64]) -> Result<PathBuf> {
        let (path, mut out) = self.create(ReportId::ClusterTable)?;
        for (cluster, (count, phi)) in counts.iter().zip(phis).enumerate() {
            writeln!(out, "{}\t{}\t{}", cluster + 1, count, phi)?;
        }
        out.finish()?;
        Ok(path)
    }

    /// One-based cluster label per SSM, one per line.
    pub fn write_ssm_clusters(&self, assignments: &[usize]) -> Result<PathBuf> {
        let (path, mut out) = self.create(ReportId::SsmClusters)?;
        for cluster in assignments {
            writeln!(out, "{}", cluster + 1)?;
        }
        out.finish()?;
        Ok(path)
    }

    /// `child\tparent` rows; the root has no parent and is skipped.
    pub fn write_node_parents(&self, parents: &[Option<PopIdx>]) -> Result<PathBuf> {
        let (path, mut out) = self.create(ReportId::NodeParents)?;
        for (child, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                writeln!(out, "{}\t{}", child, parent)?;
            }
        }
        out.finish()?;
        Ok(path)
    }

    /// Dense matrix, one space-separated row per line.
    pub fn write_matrix(&self, report: ReportId, matrix: &Array2<f64>) -> Result<PathBuf> {
        let (path, mut out) = self.create(report)?;
        for row in matrix.rows() {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(out, "{}", line.join(" "))?;
        }
        out.finish()?;
        Ok(path)
    }
}

/// Output stream of one report file.
enum ReportOut {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl ReportOut {
    /// Writes the gzip trailer, if any, and flushes to disk.
    fn finish(self) -> io::Result<()> {
        let file = match self {
            ReportOut::Plain(file) => file,
            ReportOut::Gzip(encoder) => encoder.finish()?,
        };
        file.into_inner().map_err(|e| e.into_error())?.sync_all()
    }
}

impl Write for ReportOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ReportOut::Plain(file) => file.write(buf),
            ReportOut::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ReportOut::Plain(file) => file.flush(),
            ReportOut::Gzip(encoder) => encoder.flush(),
        }
    }
}
