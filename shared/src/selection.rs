use serde::{Deserialize, Serialize};

pub const BACKGROUND_COLOR: &str = "#1a1a1a";
pub const EXPORT_BACKGROUND_COLOR: &str = "#ffffff";
pub const EXPORT_FILE_NAME: &str = "smart-note.png";

pub const PALETTE: [&str; 7] = [
    "#FFFFFF", // chalk
    "#FF9B9B",
    "#B8FF9B",
    "#9BB8FF",
    "#FFE79B",
    "#FF9BE7",
    "#9BFFF6",
];

pub const MIN_LINE_WIDTH: u32 = 1;
pub const MAX_LINE_WIDTH: u32 = 20;
pub const DEFAULT_LINE_WIDTH: u32 = 3;
const ERASER_WIDTH_FACTOR: f64 = 2.0;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    tool: Tool,
    color_index: usize,
    line_width: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color_index: 0,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

pub fn sanitize_line_width(width: u32) -> u32 {
    width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH)
}

impl Selection {
    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    pub fn color(&self) -> &'static str {
        PALETTE.get(self.color_index).copied().unwrap_or(PALETTE[0])
    }

    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    /// The swatch to highlight; none while erasing.
    pub fn active_swatch(&self) -> Option<usize> {
        match self.tool {
            Tool::Pen => Some(self.color_index),
            Tool::Eraser => None,
        }
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Picking a swatch always drops back to the pen.
    pub fn select_color(&mut self, index: usize) -> bool {
        if index >= PALETTE.len() {
            return false;
        }
        self.color_index = index;
        self.tool = Tool::Pen;
        true
    }

    pub fn set_line_width(&mut self, width: u32) -> u32 {
        self.line_width = sanitize_line_width(width);
        self.line_width
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        let width = f64::from(self.line_width);
        match self.tool {
            Tool::Pen => StrokeStyle {
                color: self.color().to_string(),
                width,
            },
            Tool::Eraser => StrokeStyle {
                color: BACKGROUND_COLOR.to_string(),
                width: width * ERASER_WIDTH_FACTOR,
            },
        }
    }
}
