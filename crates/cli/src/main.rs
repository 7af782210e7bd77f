mod provenance;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cliparea::batch::{compute_areas, BatchCfg, BatchLayout, Stride};
use cliparea::geom2::rand::{draw_pair_batch, RadialCfg};
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;

use provenance::{stride_label, write_sidecar, ReportOut, Run, Sidecar};

#[derive(Parser)]
#[command(name = "cliparea")]
#[command(about = "Intersection areas of polygon pairs")]
struct Cmd {
    /// Optional free-form tag; propagated to outputs and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrideArg {
    /// 6 values per polygon regardless of --vertices
    Triangle,
    /// --vertices * 2 values per polygon
    VertexCount,
}

impl From<StrideArg> for Stride {
    fn from(s: StrideArg) -> Self {
        match s {
            StrideArg::Triangle => Stride::Triangle,
            StrideArg::VertexCount => Stride::VertexCount,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Compute one area per row of a pair table (CSV or Parquet)
    Areas {
        #[arg(long)]
        input: String,
        #[arg(long)]
        out: String,
        #[arg(long, default_value_t = 3)]
        vertices: usize,
        /// Row width matches `vertex-count`; `triangle` is only exact for --vertices 3
        #[arg(long, value_enum, default_value_t = StrideArg::VertexCount)]
        stride: StrideArg,
        #[arg(long)]
        parallel: bool,
        /// Count clippers that are not convex and counter-clockwise
        #[arg(long)]
        validate: bool,
    },
    /// Write a table of random convex pairs
    Sample {
        #[arg(long, default_value_t = 1000)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 3)]
        vertices: usize,
        #[arg(long)]
        out: String,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Areas {
            input,
            out,
            vertices,
            stride,
            parallel,
            validate,
        } => {
            let cfg = BatchCfg {
                stride: stride.into(),
                parallel,
                validate_clippers: validate,
            };
            areas(&input, &out, vertices, cfg, cmd.tag)
        }
        Action::Sample {
            count,
            seed,
            vertices,
            out,
        } => sample(count, seed, vertices, &out, cmd.tag),
        Action::Report => report(cmd.tag),
    }
}

/// Column names for one polygon side: `{prefix}{j}x`, `{prefix}{j}y`.
fn column_names(prefix: &str, vertices: usize) -> Vec<String> {
    (0..vertices)
        .flat_map(|j| [format!("{prefix}{j}x"), format!("{prefix}{j}y")])
        .collect()
}

/// Pair table → flat subject/clipper buffers packed `vertices * 2` per row.
fn read_pairs(input: &str, vertices: usize) -> Result<(usize, Vec<f64>, Vec<f64>)> {
    let lf = if input.ends_with(".parquet") {
        LazyFrame::scan_parquet(input, ScanArgsParquet::default())?
    } else {
        LazyCsvReader::new(input)
            .with_infer_schema_length(Some(100))
            .finish()?
    };
    let df = lf
        .collect()
        .with_context(|| format!("reading pair table {input}"))?;
    let rows = df.height();
    let width = vertices * 2;
    let mut subjects = vec![0.0; rows * width];
    let mut clippers = vec![0.0; rows * width];
    for (prefix, buf) in [("s", &mut subjects), ("c", &mut clippers)] {
        for (k, name) in column_names(prefix, vertices).iter().enumerate() {
            let col = df
                .column(name)
                .with_context(|| format!("missing column {name}"))?
                .cast(&DataType::Float64)?;
            for (row, value) in col.f64()?.into_iter().enumerate() {
                buf[row * width + k] =
                    value.with_context(|| format!("null in column {name}, row {row}"))?;
            }
        }
    }
    tracing::info!(rows, cols = df.width(), "pair_table");
    Ok((rows, subjects, clippers))
}

#[derive(Serialize)]
struct AreasOut<'a> {
    areas: &'a [f64],
    report: ReportOut,
}

fn create_parent(out: &str) -> Result<()> {
    if let Some(parent) = Path::new(out).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn areas(input: &str, out: &str, vertices: usize, cfg: BatchCfg, tag: Option<String>) -> Result<()> {
    tracing::info!(input, out, vertices, stride = ?cfg.stride, parallel = cfg.parallel, tag = ?tag, "areas");
    if cfg.stride == Stride::Triangle && vertices != 3 {
        tracing::warn!(
            vertices,
            "triangle stride reads overlapping windows of {}-value rows",
            vertices * 2
        );
    }
    let (pairs, subjects, clippers) = read_pairs(input, vertices)?;
    let layout = BatchLayout {
        pairs,
        vertices,
        dims: 2,
    };
    let mut areas = vec![0.0; pairs];
    let report = compute_areas(layout, &subjects, &clippers, &mut areas, &cfg)
        .context("batch rejected")?;
    if report.invalid_clippers > 0 {
        tracing::warn!(
            invalid = report.invalid_clippers,
            "clippers failed the convex/CCW check"
        );
    }

    create_parent(out)?;
    let doc = AreasOut {
        areas: &areas,
        report: report.into(),
    };
    std::fs::write(out, serde_json::to_vec_pretty(&doc)?).with_context(|| format!("writing {out}"))?;

    let run = Run::Areas {
        input,
        vertices,
        stride: stride_label(cfg.stride),
        parallel: cfg.parallel,
        validate_clippers: cfg.validate_clippers,
        report: report.into(),
    };
    write_sidecar(out, run, tag.as_deref())?;
    Ok(())
}

fn sample(count: usize, seed: u64, vertices: usize, out: &str, tag: Option<String>) -> Result<()> {
    tracing::info!(count, seed, vertices, out, tag = ?tag, "sample");
    let batch = draw_pair_batch(RadialCfg::default(), seed, count, vertices)
        .with_context(|| format!("sampler gave up drawing {vertices}-gons"))?;
    let width = batch.layout.vertices * 2;
    let mut columns: Vec<Series> = Vec::with_capacity(2 * width);
    for (prefix, buf) in [("s", &batch.subjects), ("c", &batch.clippers)] {
        for (k, name) in column_names(prefix, batch.layout.vertices).into_iter().enumerate() {
            let values: Vec<f64> = buf.iter().skip(k).step_by(width).copied().collect();
            columns.push(Series::new(name.as_str().into(), values));
        }
    }
    let mut df = DataFrame::new(columns)?;

    create_parent(out)?;
    let mut file = std::fs::File::create(out).with_context(|| format!("creating {out}"))?;
    CsvWriter::new(&mut file).finish(&mut df)?;

    let run = Run::Sample {
        count,
        seed,
        vertices: batch.layout.vertices,
    };
    write_sidecar(out, run, tag.as_deref())?;
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let sidecar = Sidecar::new(Run::Report, tag.as_deref());
    println!("{}", serde_json::to_string_pretty(&sidecar)?);
    Ok(())
}
