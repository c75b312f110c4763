use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::io;

/// Reads a text corpus file and returns its full content as a `String`.
///
/// - Checks for existence up front so a missing source fails before
///   any tokenization happens, with an error naming the path
/// - Reads the entire file into memory (UTF-8)
pub(crate) fn read_file<P: AsRef<Path>>(filepath: P) -> io::Result<String> {
	let path = filepath.as_ref();

	if !path.exists() {
		return Err(io::Error::new(
			io::ErrorKind::NotFound,
			format!("Source file '{}' not found", path.display()),
		));
	}

	let mut contents = String::new();
	File::open(path)?.read_to_string(&mut contents)?;
	Ok(contents)
}
