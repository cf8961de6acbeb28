use std::fs;
use std::path::{Path, PathBuf};

pub const TEST_DIR: &str = "../tmp";

/// Expands to the name of the enclosing test function.
macro_rules! test_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        let name = type_name_of(f);

        // Find and cut the rest of the path
        match &name[..name.len() - 3].rfind(':') {
            Some(pos) => &name[pos + 1..name.len() - 3],
            None => &name[..name.len() - 3],
        }
    }};
}

pub(crate) use test_name;

/**
   Creates directories under the tmp directory, prefixed with the test name,
   and removes them (RAII) when the calling scope ends, even if the test fails.

   e.g. set_up_dirs!(dirs, "db", "data")
*/
macro_rules! set_up_dirs {
    ($dir_var:ident, $($x:expr),+ $(,)? ) => {
        let _prefix = crate::utils::test::test_name!().to_string() + "$";
        let _dirs: Vec<String> = vec![$(_prefix.clone() + $x),+];
        let _tmp = crate::utils::test::TestDir::new_and_create(&_dirs);
        let $dir_var = _tmp.dirs.clone();
    };
}

pub(crate) use set_up_dirs;

/**
   Reserves file paths under the tmp directory, prefixed with the test name.
   The files are removed when the calling scope ends.

   e.g. set_up_files!(paths, "incidents.csv", "store.sqlite")
*/
macro_rules! set_up_files {
    ($path_var:ident, $($x:expr),+ $(,)?) => {
        let _prefix = crate::utils::test::test_name!().to_string() + "$";
        let _paths: Vec<String> = vec![$(_prefix.clone() + $x),+];
        let _tmp = crate::utils::test::TestFile::new(&_paths);
        let $path_var = _tmp.paths.clone();
    };
}

pub(crate) use set_up_files;

pub struct TestDir {
    pub dirs: Vec<PathBuf>,
}

impl TestDir {
    pub fn new_and_create<S: AsRef<str>>(dirs: &[S]) -> Self {
        let dirs = dirs
            .iter()
            .map(|dir| {
                let path = Path::new(TEST_DIR).join(dir.as_ref());
                // Leftovers from an aborted run.
                let _ = fs::remove_dir_all(&path);
                fs::create_dir_all(&path).unwrap();
                path
            })
            .collect();
        Self { dirs }
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        for dir in &self.dirs {
            let _ = fs::remove_dir_all(dir);
        }
    }
}

pub struct TestFile {
    pub paths: Vec<PathBuf>,
}

impl TestFile {
    pub fn new<S: AsRef<str>>(paths: &[S]) -> Self {
        fs::create_dir_all(TEST_DIR).unwrap();
        let paths = paths
            .iter()
            .map(|path| {
                let path = Path::new(TEST_DIR).join(path.as_ref());
                let _ = fs::remove_file(&path);
                path
            })
            .collect();
        Self { paths }
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        for path in &self.paths {
            let _ = fs::remove_file(path);
        }
    }
}

pub fn write_csv(path: impl AsRef<Path>, contents: &str) {
    fs::write(path, contents).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_no_creation() {
        let file = TestFile::new(&["test_file_no_creation.csv"]);
        let expected_path = Path::new(TEST_DIR).join("test_file_no_creation.csv");
        assert!(!expected_path.exists());

        write_csv(&expected_path, "a,b\n");
        drop(file);
        assert!(!expected_path.exists());
    }

    #[test]
    fn test_dir_creation() {
        let dir = TestDir::new_and_create(&["test_dir_creation"]);
        let expected_dir = Path::new(TEST_DIR).join("test_dir_creation");
        assert!(expected_dir.exists());
        drop(dir);
        assert!(!expected_dir.exists());
    }

    #[test]
    fn test_macro_prefixes_test_name() {
        set_up_dirs!(dirs, "db");
        assert!(dirs[0].ends_with("test_macro_prefixes_test_name$db"));
        assert!(dirs[0].exists());
    }
}
