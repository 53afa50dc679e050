//! Builder for SVG path data and number formatting.

use std::fmt::Write as _;

/// Round half up, the way the reference metrics were produced.
pub fn round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Shortest representation of a number, integers without a fraction and
/// no negative zero.
pub fn fmt_num(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Incremental path data, e.g. `M0,5h10`.
///
/// Commands are appended with comma-separated arguments and no separator
/// between commands unless [`PathData::space`] is called.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    data: String,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    fn cmd(mut self, name: char, args: &[f64]) -> Self {
        self.data.push(name);
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.data.push(',');
            }
            let _ = write!(self.data, "{}", fmt_num(*arg));
        }
        self
    }

    pub fn move_to(self, x: f64, y: f64) -> Self {
        self.cmd('M', &[x, y])
    }

    pub fn line_to(self, x: f64, y: f64) -> Self {
        self.cmd('L', &[x, y])
    }

    pub fn line_by(self, dx: f64, dy: f64) -> Self {
        self.cmd('l', &[dx, dy])
    }

    pub fn horizontal_to(self, x: f64) -> Self {
        self.cmd('H', &[x])
    }

    pub fn horizontal_by(self, dx: f64) -> Self {
        self.cmd('h', &[dx])
    }

    pub fn vertical_by(self, dy: f64) -> Self {
        self.cmd('v', &[dy])
    }

    /// Relative elliptical arc
    pub fn arc_by(self, rx: f64, ry: f64, large: bool, sweep: bool, dx: f64, dy: f64) -> Self {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        self.cmd('a', &[rx, ry, 0.0, flag(large), flag(sweep), dx, dy])
    }

    pub fn close(mut self) -> Self {
        self.data.push('z');
        self
    }

    pub fn space(mut self) -> Self {
        self.data.push(' ');
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn build(self) -> String {
        self.data
    }
}
