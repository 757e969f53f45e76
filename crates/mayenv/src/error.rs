use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvError {
	#[error("invalid exclude pattern '{pattern}': {source}")]
	Pattern {
		pattern: String,
		#[source]
		source: glob::PatternError,
	},
}
