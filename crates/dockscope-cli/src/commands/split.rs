use super::read_text;
use crate::cli::SplitArgs;
use crate::error::Result;
use dockscope::core::io::extract::split_poses;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

fn pose_path(output_dir: &Path, stem: &str, model_number: u32) -> PathBuf {
    output_dir.join(format!("{stem}_pose_{model_number}.pdbqt"))
}

pub async fn run(args: SplitArgs) -> Result<()> {
    let text = read_text(&args.input).await?;
    if text.trim().is_empty() {
        warn!("{:?} is empty; nothing to split.", &args.input);
        println!("No poses found in {}.", args.input.display());
        return Ok(());
    }
    let blocks = split_poses(&text);

    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pose");

    tokio::fs::create_dir_all(&args.output_dir).await?;
    for block in &blocks {
        let path = pose_path(&args.output_dir, stem, block.model_number);
        info!(model = block.model_number, "Writing pose to {:?}", &path);
        tokio::fs::write(&path, &block.text).await?;
    }

    println!(
        "Wrote {} pose(s) to {}",
        blocks.len(),
        args.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TWO_POSES;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_one_file_per_pose() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("lig_out.pdbqt");
        let output_dir = dir.path().join("poses");
        fs::write(&input, TWO_POSES).unwrap();

        run(SplitArgs {
            input,
            output_dir: output_dir.clone(),
        })
        .await
        .unwrap();

        let first = fs::read_to_string(output_dir.join("lig_out_pose_1.pdbqt")).unwrap();
        let second = fs::read_to_string(output_dir.join("lig_out_pose_2.pdbqt")).unwrap();
        assert!(first.contains("-7.50"));
        assert!(second.contains("-6.20"));
        assert!(second.ends_with("ENDMDL\n"));
        assert!(!output_dir.join("lig_out_pose_3.pdbqt").exists());
    }

    #[tokio::test]
    async fn file_without_models_is_copied_as_one_pose() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("ligand.pdbqt");
        let output_dir = dir.path().join("poses");
        let ligand =
            "ATOM      1  C1  UNL     1       0.000   0.000   0.000  0.00  0.00    +0.000 C\n";
        fs::write(&input, ligand).unwrap();

        run(SplitArgs {
            input,
            output_dir: output_dir.clone(),
        })
        .await
        .unwrap();

        let copied = fs::read_to_string(output_dir.join("ligand_pose_1.pdbqt")).unwrap();
        assert_eq!(copied, ligand);
    }

    #[tokio::test]
    async fn only_empty_models_copy_the_whole_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.pdbqt");
        let output_dir = dir.path().join("poses");
        fs::write(&input, "MODEL 1\nENDMDL\n").unwrap();

        run(SplitArgs {
            input,
            output_dir: output_dir.clone(),
        })
        .await
        .unwrap();

        let copied = fs::read_to_string(output_dir.join("empty_pose_1.pdbqt")).unwrap();
        assert_eq!(copied, "MODEL 1\nENDMDL\n");
    }

    #[tokio::test]
    async fn blank_file_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("blank.pdbqt");
        let output_dir = dir.path().join("poses");
        fs::write(&input, "\n").unwrap();

        run(SplitArgs {
            input,
            output_dir: output_dir.clone(),
        })
        .await
        .unwrap();

        assert!(!output_dir.exists());
    }
}
