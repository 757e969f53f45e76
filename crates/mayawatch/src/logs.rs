use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// First free `<name>.log`, `<name>.1.log`, `<name>.2.log`, ... in `log_dir`.
pub fn watched_log_path(log_dir: &Path, name: &str) -> PathBuf {
	let candidate = log_dir.join(format!("{}.log", name));
	if !candidate.exists() {
		return candidate;
	}
	let mut n: u32 = 1;
	loop {
		let candidate = log_dir.join(format!("{}.{}.log", name, n));
		if !candidate.exists() {
			return candidate;
		}
		n += 1;
	}
}

/// Incremental reader over a log file another process appends to.
///
/// `offset` counts lines already emitted and `position` is the byte just past
/// the last of them. Neither goes backwards.
#[derive(Debug)]
pub struct LogTail {
	path: PathBuf,
	offset: usize,
	position: u64,
	last_seen: Option<(SystemTime, u64)>,
}

impl LogTail {
	/// Creates a fresh, empty log file under a name nobody is using yet.
	pub fn create(log_dir: &Path, name: &str) -> io::Result<Self> {
		fs::create_dir_all(log_dir)?;
		let path = watched_log_path(log_dir, name);
		File::create(&path)?;
		Ok(Self::open(path))
	}

	/// Tails an existing path from its first line.
	pub fn open(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			offset: 0,
			position: 0,
			last_seen: None,
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn position(&self) -> u64 {
		self.position
	}

	/// New complete lines, or nothing if the file has not changed since the
	/// last poll.
	pub fn poll(&mut self) -> io::Result<Vec<String>> {
		let seen = match fs::metadata(&self.path) {
			Ok(meta) => Some((meta.modified()?, meta.len())),
			Err(e) if e.kind() == io::ErrorKind::NotFound => None,
			Err(e) => return Err(e),
		};
		if seen.is_none() || seen == self.last_seen {
			return Ok(Vec::new());
		}
		self.last_seen = seen;
		self.read_new(false)
	}

	/// Everything not yet emitted, including an unterminated last line.
	pub fn drain(&mut self) -> io::Result<Vec<String>> {
		self.read_new(true)
	}

	pub fn remove(self) -> io::Result<()> {
		match fs::remove_file(&self.path) {
			Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
			_ => Ok(()),
		}
	}

	fn read_new(&mut self, include_partial: bool) -> io::Result<Vec<String>> {
		let mut file = match File::open(&self.path) {
			Ok(f) => f,
			Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(e),
		};
		file.seek(SeekFrom::Start(self.position))?;
		let mut bytes = Vec::new();
		file.read_to_end(&mut bytes)?;

		let mut lines = Vec::new();
		let mut consumed = 0;
		for chunk in bytes.split_inclusive(|&b| b == b'\n') {
			let line = match chunk.strip_suffix(b"\n") {
				Some(complete) => complete.strip_suffix(b"\r").unwrap_or(complete),
				None if include_partial => chunk,
				None => break,
			};
			lines.push(String::from_utf8_lossy(line).into_owned());
			consumed += chunk.len();
		}
		self.position += consumed as u64;
		self.offset += lines.len();
		Ok(lines)
	}
}
