use super::{load_set, open_output};
use crate::cli::{MatchArgs, MatchMode};
use crate::config::load_energy_model;
use crate::error::Result;
use domainseq::engine::matcher::{longest, strongest};
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct LongestRecord {
    i: usize,
    j: usize,
    a_start: i64,
    b_start: i64,
    length: usize,
}

#[derive(Serialize)]
struct StrongestRecord {
    i: usize,
    j: usize,
    a_start: i64,
    b_start: i64,
    length: usize,
    energy: f64,
}

pub fn run(args: MatchArgs) -> Result<()> {
    let model = load_energy_model(args.params.as_deref())?;
    let first = load_set(&args.first, &model)?;
    let second = load_set(&args.second, &model)?;

    info!(
        "Matching {} x {} pairs in {:?} mode.",
        first.numseqs(),
        second.numseqs(),
        args.mode
    );

    let mut writer = csv::Writer::from_writer(open_output(args.output.as_deref())?);
    match args.mode {
        MatchMode::Longest => {
            let grid = longest::longest_common_substrings_product(first.matrix(), second.matrix());
            for (i, j, m) in grid.iter() {
                writer.serialize(LongestRecord {
                    i,
                    j,
                    a_start: m.a_start,
                    b_start: m.b_start,
                    length: m.length,
                })?;
            }
        }
        MatchMode::Strongest => {
            let table = model.table(args.temperature, true);
            let partners = second.matrix().reverse_complement();
            let grid =
                strongest::strongest_common_substrings_product(first.matrix(), &partners, &table);
            for (i, j, m) in grid.iter() {
                writer.serialize(StrongestRecord {
                    i,
                    j,
                    a_start: m.a_start,
                    b_start: m.b_start,
                    length: m.length,
                    energy: m.energy,
                })?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_list(path: &std::path::Path, seqs: &[&str]) {
        let mut content = format!("{} {}\n", seqs.len(), seqs[0].len());
        for s in seqs {
            content.push_str(s);
            content.push('\n');
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn longest_mode_writes_one_row_per_pair() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let out = dir.path().join("out.csv");
        write_list(&a, &["AACCGG", "TTTTTT"]);
        write_list(&b, &["CCGGAA", "GGGGGG", "ATATAT"]);

        run(MatchArgs {
            first: a,
            second: b,
            mode: MatchMode::Longest,
            temperature: 37.0,
            output: Some(out.clone()),
            params: None,
        })
        .unwrap();

        let content = fs::read_to_string(out).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "i,j,a_start,b_start,length");
        assert_eq!(lines.len(), 1 + 2 * 3);
        assert_eq!(lines[1], "0,0,2,0,4");
    }

    #[test]
    fn strongest_mode_adds_an_energy_column() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let out = dir.path().join("out.csv");
        write_list(&a, &["ACGTTGCA"]);
        write_list(&b, &["TGCAACGT"]);

        run(MatchArgs {
            first: a,
            second: b,
            mode: MatchMode::Strongest,
            temperature: 37.0,
            output: Some(out.clone()),
            params: None,
        })
        .unwrap();

        let content = fs::read_to_string(out).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("i,j,a_start,b_start,length,energy"));
        let fields: Vec<_> = lines.next().unwrap().split(',').collect();
        assert_eq!(&fields[..5], &["0", "0", "0", "0", "8"]);
        assert!(fields[5].parse::<f64>().unwrap() > 0.0);
    }
}
