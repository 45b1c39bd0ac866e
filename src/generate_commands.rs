use include_dir::{include_dir, Dir};
use std::fs;
use std::path::Path;
use tracing::{error, info};

static SAMPLE_DIR: Dir = include_dir!("sample");

/// Print the default prompt instruction template so users can copy and
/// customize it.
pub fn generate_template() {
    println!("{}", crate::export::to_prompt::get_template());
}

/// Emit the embedded sample project (tracker plan plus a seeded item
/// record) into a directory.
pub fn generate_sample(dir: String) {
    info!("Generating sample project: {:?}", dir);
    let target_path = Path::new(&dir);
    if let Err(e) = fs::create_dir_all(target_path) {
        error!("Failed to create target directory: {:?}", e);
        return;
    }

    fn write_dir_contents(dir: &Dir, target_path: &Path) {
        for file in dir.files() {
            let relative_path = file.path();
            let target_file_path = target_path.join(relative_path);

            if let Some(parent) = target_file_path.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    error!("Failed to create directory: {:?}", e);
                    return;
                }
            }

            if let Err(e) = fs::write(&target_file_path, file.contents()) {
                error!("Failed to write file: {:?}", e);
                return;
            }
        }

        // File paths are relative to the embedded root, so subdirectories
        // recurse against the same target.
        for sub_dir in dir.dirs() {
            write_dir_contents(sub_dir, target_path);
        }
    }

    write_dir_contents(&SAMPLE_DIR, target_path);

    info!("Sample project generated successfully at: {:?}", dir);
}
