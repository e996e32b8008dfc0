use crate::utils::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Collects the containers to process. A directory yields every file with a
/// matching extension (top level only unless `recursive`), sorted.
pub fn find_media_files<P: AsRef<Path>>(
    path: P,
    extensions: &[String],
    recursive: bool,
) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::validation(format!(
            "Path does not exist: {}",
            path.display()
        )));
    }

    let mut media_files = Vec::new();

    if path.is_file() {
        if has_extension(path, extensions) {
            media_files.push(path.to_path_buf());
        } else {
            return Err(Error::validation(format!(
                "File is not a supported container ({}): {}",
                extensions.join(", "),
                path.display()
            )));
        }
    } else if path.is_dir() {
        let mut walker = WalkDir::new(path).follow_links(false).min_depth(1);
        if !recursive {
            walker = walker.max_depth(1);
        }

        for entry in walker.into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() && has_extension(path, extensions) {
                media_files.push(path.to_path_buf());
            }
        }

        if media_files.is_empty() {
            return Err(Error::validation(format!(
                "No {} files found in directory: {}",
                extensions.join("/"),
                path.display()
            )));
        }

        media_files.sort();
    } else {
        return Err(Error::validation(format!(
            "{} is neither a file nor a directory",
            path.display()
        )));
    }

    Ok(media_files)
}

pub fn has_extension<P: AsRef<Path>>(path: P, extensions: &[String]) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}

/// Output path next to the input. The input name itself is always taken, so
/// the first free `<stem>_<n>.<ext>` is used.
pub fn create_output_path<P: AsRef<Path>>(input_path: P) -> PathBuf {
    let input_path = input_path.as_ref();
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let extension = input_path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "mkv".to_string());

    let mut new_path = input_path.to_path_buf();
    let mut counter = 1;
    while new_path.exists() {
        new_path = input_path.with_file_name(format!("{}_{}.{}", stem, counter, extension));
        counter += 1;
    }

    debug!("Output path: {}", new_path.display());
    new_path
}

/// Directory holding `path`. A bare file name lives in the current directory.
fn containing_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// `<dir>/<stem>.<extension>` for the given container.
pub fn companion_subtitle_path<P: AsRef<Path>>(input_path: P, extension: &str) -> PathBuf {
    input_path
        .as_ref()
        .with_extension(extension.trim_start_matches('.'))
}

/// Moves every file sharing the input's stem into `<dir>/<moved_dir_name>`,
/// then renames the remuxed output to the input's original name. Returns the
/// final location of the output.
pub fn move_completed<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    moved_dir_name: &str,
) -> Result<PathBuf> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();
    let directory = containing_dir(input_path);
    let stem = input_path.file_stem().map(|s| s.to_os_string());
    let output_name = output_path.file_name();

    let to_move: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name() != output_name
                && p.file_stem().map(|s| s.to_os_string()) == stem
        })
        .collect();

    if to_move.is_empty() {
        return Ok(output_path.to_path_buf());
    }

    let moved_dir = directory.join(moved_dir_name);
    if !moved_dir.exists() {
        std::fs::create_dir_all(&moved_dir)?;
        info!("Created directory: {}", moved_dir.display());
    }

    for file in &to_move {
        let Some(name) = file.file_name() else {
            continue;
        };
        let target = moved_dir.join(name);
        match std::fs::rename(file, &target) {
            Ok(()) => debug!("Moved {} -> {}", file.display(), target.display()),
            Err(e) => warn!("Could not move {}: {}", file.display(), e),
        }
    }

    if input_path.exists() {
        warn!(
            "{} is still in place, keeping output at {}",
            input_path.display(),
            output_path.display()
        );
        return Ok(output_path.to_path_buf());
    }

    std::fs::rename(output_path, input_path)?;
    info!(
        "Renamed {} -> {}",
        output_path.display(),
        input_path.display()
    );
    Ok(input_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn mkv() -> Vec<String> {
        vec!["mkv".to_string()]
    }

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("show.mkv", &mkv()));
        assert!(has_extension("show.MKV", &mkv()));
        assert!(has_extension("show.mp4", &["mkv".to_string(), ".mp4".to_string()]));
        assert!(!has_extension("show.srt", &mkv()));
        assert!(!has_extension("show", &mkv()));
    }

    #[test]
    fn test_find_media_files_top_level_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.mkv"));
        touch(&dir.path().join("a.mkv"));
        touch(&dir.path().join("a.srt"));
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested").join("c.mkv"));

        let files = find_media_files(dir.path(), &mkv(), false).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.mkv", "b.mkv"]);

        let files = find_media_files(dir.path(), &mkv(), true).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_find_media_files_rejects_bad_inputs() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_media_files(dir.path(), &mkv(), false).is_err());
        assert!(find_media_files(dir.path().join("missing.mkv"), &mkv(), false).is_err());

        let srt = dir.path().join("a.srt");
        touch(&srt);
        assert!(find_media_files(&srt, &mkv(), false).is_err());

        let mkv_file = dir.path().join("a.mkv");
        touch(&mkv_file);
        assert_eq!(find_media_files(&mkv_file, &mkv(), false).unwrap(), vec![mkv_file]);
    }

    #[test]
    fn test_create_output_path_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("show.mkv");
        touch(&input);

        assert_eq!(create_output_path(&input), dir.path().join("show_1.mkv"));

        touch(&dir.path().join("show_1.mkv"));
        assert_eq!(create_output_path(&input), dir.path().join("show_2.mkv"));
    }

    #[test]
    fn test_companion_subtitle_path() {
        assert_eq!(
            companion_subtitle_path("/media/Show S01E01.mkv", "srt"),
            PathBuf::from("/media/Show S01E01.srt")
        );
        assert_eq!(
            companion_subtitle_path("/media/show.mkv", ".ass"),
            PathBuf::from("/media/show.ass")
        );
    }

    #[test]
    fn test_move_completed_moves_siblings_and_renames_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("show.mkv");
        let srt = dir.path().join("show.srt");
        let other = dir.path().join("other.mkv");
        let output = dir.path().join("show_1.mkv");
        for path in [&input, &srt, &other, &output] {
            touch(path);
        }

        let final_path = move_completed(&input, &output, "moved").unwrap();

        assert_eq!(final_path, input);
        assert!(input.exists());
        assert!(!output.exists());
        assert!(other.exists());
        assert!(dir.path().join("moved").join("show.mkv").exists());
        assert!(dir.path().join("moved").join("show.srt").exists());
    }

    #[test]
    fn test_bare_file_name_resolves_to_current_dir() {
        assert_eq!(containing_dir(Path::new("show.mkv")), Path::new("."));
        assert_eq!(containing_dir(Path::new("media/show.mkv")), Path::new("media"));
    }

    #[test]
    fn test_move_completed_with_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();

        for name in ["show.mkv", "show.srt", "other.mkv"] {
            touch(Path::new(name));
        }
        let output = create_output_path("show.mkv");
        touch(&output);
        let result = move_completed("show.mkv", &output, "moved");

        std::env::set_current_dir(previous).unwrap();

        assert_eq!(output, PathBuf::from("show_1.mkv"));
        assert_eq!(result.unwrap(), PathBuf::from("show.mkv"));
        assert!(dir.path().join("show.mkv").exists());
        assert!(!dir.path().join("show_1.mkv").exists());
        assert!(dir.path().join("other.mkv").exists());
        assert!(dir.path().join("moved").join("show.mkv").exists());
        assert!(dir.path().join("moved").join("show.srt").exists());
    }
}
