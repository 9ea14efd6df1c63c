//! Tests for command-line parsing and command output

#[cfg(test)]
mod tests {
    use crate::dataset::write_replicate;
    use clap::Parser;
    use ndarray::{Array2, array, s};
    use ndarray_npy::write_npy;
    use spotprep::DatasetError;
    use spotprep::io::cli::{Cli, Command, CommandRunner};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn run(args: &[&str]) -> spotprep::Result<String> {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        CommandRunner::new(cli).run(&mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    // Tests patch defaults come from the configured constants
    // Verified by changing the default patch size
    #[test]
    fn test_patch_defaults() {
        let cli = Cli::try_parse_from(["spotprep", "patch", "mask.npy"]).unwrap();

        assert!(cli.should_show_progress());
        match cli.command {
            Command::Patch {
                mask,
                height,
                width,
                attempts,
                seed,
            } => {
                assert_eq!(mask, PathBuf::from("mask.npy"));
                assert_eq!((height, width), (200, 200));
                assert_eq!(attempts, 20);
                assert_eq!(seed, 42);
            }
            _ => unreachable!("Expected Patch command"),
        }
    }

    // Tests short flags and the global quiet switch
    // Verified by making --quiet a top-level only flag
    #[test]
    fn test_patch_short_flags() {
        let cli = Cli::try_parse_from([
            "spotprep", "patch", "m.tif", "-H", "32", "-w", "16", "-a", "5", "-s", "7", "-q",
        ])
        .unwrap();

        assert!(!cli.should_show_progress());
        match cli.command {
            Command::Patch {
                height,
                width,
                attempts,
                seed,
                ..
            } => assert_eq!((height, width, attempts, seed), (32, 16, 5, 7)),
            _ => unreachable!("Expected Patch command"),
        }
    }

    // Tests focus padding accepts negative values
    // Verified by disallowing negative numbers
    #[test]
    fn test_focus_arguments() {
        let defaults = Cli::try_parse_from(["spotprep", "focus", "curve.npy"]).unwrap();
        let custom =
            Cli::try_parse_from(["spotprep", "focus", "curve.npy", "-b", "-2", "--top", "3"])
                .unwrap();

        match (defaults.command, custom.command) {
            (
                Command::Focus {
                    bottom: 5, top: 10, ..
                },
                Command::Focus {
                    bottom: -2, top: 3, ..
                },
            ) => {}
            _ => unreachable!("Expected Focus commands with parsed padding"),
        }
    }

    // Tests fetch requires a URL
    // Verified by making the URL optional
    #[test]
    fn test_fetch_arguments() {
        assert!(Cli::try_parse_from(["spotprep", "fetch", "data"]).is_err());

        let cli =
            Cli::try_parse_from(["spotprep", "fetch", "data", "--url", "https://example.org/a.zip"])
                .unwrap();
        match cli.command {
            Command::Fetch { target_dir, url } => {
                assert_eq!(target_dir, PathBuf::from("data"));
                assert_eq!(url, "https://example.org/a.zip");
            }
            _ => unreachable!("Expected Fetch command"),
        }
    }

    // Tests group and check take a root directory
    // Verified by dropping the positional root
    #[test]
    fn test_root_commands() {
        assert!(matches!(
            Cli::try_parse_from(["spotprep", "group", "data"]).unwrap().command,
            Command::Group { .. }
        ));
        assert!(matches!(
            Cli::try_parse_from(["spotprep", "check", "data"]).unwrap().command,
            Command::Check { .. }
        ));
        assert!(Cli::try_parse_from(["spotprep", "check"]).is_err());
        assert!(Cli::try_parse_from(["spotprep"]).is_err());
    }

    // Tests the check report text for one complete and one partial replicate
    // Verified by printing only incomplete replicates
    #[test]
    fn test_check_output() {
        let dir = TempDir::new().unwrap();
        write_replicate(dir.path(), "A", "01", &["CY3", "DAPI", "DIC"]);
        write_replicate(dir.path(), "B", "02", &["CY3", "DAPI"]);
        let root = dir.path().to_string_lossy().into_owned();

        let output = run(&["spotprep", "check", &root]).unwrap();

        let separator = "-".repeat(50);
        let expected = format!(
            "testing A 1\nok\n{separator}\ntesting B 2\ncould not find DIC in B 2\n{separator}\n"
        );
        assert_eq!(output, expected);
    }

    // Tests group output lists every role and the output name
    // Verified by omitting the output name entry
    #[test]
    fn test_group_output() {
        let dir = TempDir::new().unwrap();
        write_replicate(dir.path(), "A", "01", &["CY3", "DAPI"]);
        let root = dir.path().to_string_lossy().into_owned();

        let output = run(&["spotprep", "group", &root]).unwrap();

        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("A 1"));
        assert!(output.contains("  CY3: "));
        assert!(output.contains("  DAPI: "));
        assert!(output.contains("  nuclear_mask: "));
        assert!(output.contains("  output_name: A_CY3_01"));
    }

    // Tests the focus command on the reference curve
    // Verified by printing the clamped range only
    #[test]
    fn test_focus_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("curve.npy");
        write_npy(&path, &array![0.0, 1.0, 2.0, 10.0, 9.0, 8.0, 1.0, 0.0]).unwrap();
        let file = path.to_string_lossy().into_owned();

        let output = run(&["spotprep", "focus", &file]).unwrap();

        assert_eq!(output, "in-focus range -3..15 (slices 0..8 of 8)\n");
    }

    // Tests 2D input is rejected by the focus command
    // Verified by flattening any input into a curve
    #[test]
    fn test_focus_rejects_images() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("image.npy");
        write_npy(&path, &Array2::<f64>::zeros((4, 4))).unwrap();
        let file = path.to_string_lossy().into_owned();

        let result = run(&["spotprep", "focus", &file]);

        assert!(matches!(result, Err(DatasetError::InvalidArrayData { .. })));
    }

    // Tests the patch command reports the densest sampled window
    // Verified by ignoring the seed argument
    #[test]
    fn test_patch_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mask.npy");
        let mut mask = Array2::<u16>::zeros((8, 8));
        mask.slice_mut(s![..4, ..4]).fill(2);
        write_npy(&path, &mask).unwrap();
        let file = path.to_string_lossy().into_owned();

        let full = run(&["spotprep", "patch", &file, "-H", "8", "-w", "8"]).unwrap();
        let empty = run(&["spotprep", "patch", &file, "-H", "4", "-w", "4", "-a", "0"]).unwrap();

        assert_eq!(full, "densest patch at row 0, col 0 (16 foreground pixels)\n");
        assert_eq!(empty, "no foreground found in 0 sampled patches\n");
    }

    // Tests unsupported file types are rejected up front
    // Verified by silently skipping unknown extensions
    #[test]
    fn test_unknown_extension() {
        let result = run(&["spotprep", "patch", "mask.csv"]);

        assert!(matches!(
            result,
            Err(DatasetError::InvalidParameter {
                parameter: "path",
                ..
            })
        ));
    }
}
