//! FFmpeg command and filter-graph builder utilities
//!
//! This module provides builders for constructing ffmpeg commands and
//! `-filter_complex` graphs with the options used throughout the crate.

use ffmpeg_sidecar::command::FfmpegCommand;

/// Builder for creating `FFmpeg` commands with common configurations
///
/// Every command hides the banner and overwrites an existing output (`-y`).
pub struct FfmpegCommandBuilder {
    cmd: FfmpegCommand,
}

impl Default for FfmpegCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegCommandBuilder {
    /// Creates a new `FFmpeg` command builder with sensible defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            cmd: FfmpegCommand::new(),
        }
    }

    /// Uses a specific ffmpeg binary instead of the one on `PATH`
    #[must_use]
    pub fn with_path(mut self, path: &str) -> Self {
        self.cmd = FfmpegCommand::new_with_path(path);
        self
    }

    /// Builds the `FFmpeg` command with all configured options
    #[must_use]
    pub fn build(mut self) -> FfmpegCommand {
        self.cmd.hide_banner();
        self.cmd.overwrite();
        self.cmd
    }
}

/// One labelled chain of a filter graph, e.g. `[0:v]setpts=2*PTS[v]`.
#[derive(Debug, Clone, PartialEq)]
struct FilterChain {
    input: String,
    filters: Vec<String>,
    output: String,
}

/// Builder for `-filter_complex` graphs made of independent labelled chains.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGraph {
    chains: Vec<FilterChain>,
}

impl FilterGraph {
    /// Creates a new empty filter graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a chain reading `input` (e.g. `0:a`) and writing `output` (e.g. `a`).
    ///
    /// Empty filters are dropped; a chain left with no filters is skipped.
    #[must_use]
    pub fn chain<I, S>(mut self, input: &str, filters: I, output: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let filters: Vec<String> = filters
            .into_iter()
            .map(Into::into)
            .filter(|f| !f.is_empty())
            .collect();
        if !filters.is_empty() {
            self.chains.push(FilterChain {
                input: input.to_string(),
                filters,
                output: output.to_string(),
            });
        }
        self
    }

    /// Output pads, bracketed for use with `-map`.
    #[must_use]
    pub fn output_labels(&self) -> Vec<String> {
        self.chains
            .iter()
            .map(|c| format!("[{}]", c.output))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Builds the graph into a single `;`-separated string
    #[must_use]
    pub fn build(&self) -> Option<String> {
        if self.chains.is_empty() {
            return None;
        }
        Some(
            self.chains
                .iter()
                .map(|c| format!("[{}]{}[{}]", c.input, c.filters.join(","), c.output))
                .collect::<Vec<_>>()
                .join(";"),
        )
    }

    /// Builds the graph into `-filter_complex <graph>` followed by one
    /// `-map [label]` per chain output.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let Some(graph) = self.build() else {
            return Vec::new();
        };
        let mut args = vec!["-filter_complex".to_string(), graph];
        for label in self.output_labels() {
            args.push("-map".to_string());
            args.push(label);
        }
        args
    }
}
