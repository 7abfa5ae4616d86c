//! Layout descriptions.
//!
//! A [`Layout`] lives on a container node and positions that node's
//! children. Per-child inputs (stretch weight, grid [`Anchor`], fixed size)
//! live on the children themselves.

use arbor_geom::{Axis, Margin};

pub(crate) mod engine;

/// How a layout resolves sizes against its available space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizePolicy {
    /// Children keep their natural size; nothing stretches.
    Freeform,
    /// Children stretch into the available space. At the root, the natural
    /// size also becomes the host window's minimum extent.
    Minimum,
    /// Children stretch into the available space.
    Maximum,
    /// Use the nearest ancestor layout's policy.
    #[default]
    Inherit,
}

/// Primary axis of a box layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Children run left to right.
    Horizontal,
    /// Children run top to bottom.
    Vertical,
    /// Children overlap at the content origin.
    None,
}

impl Alignment {
    /// The primary axis, if any.
    pub fn axis(self) -> Option<Axis> {
        match self {
            Self::Horizontal => Some(Axis::Horizontal),
            Self::Vertical => Some(Axis::Vertical),
            Self::None => None,
        }
    }
}

/// Placement of a child inside its grid cell, per axis.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellAlign {
    /// Stretch across the cell.
    #[default]
    Fill,
    /// Natural size at the cell start.
    Start,
    /// Natural size, centred.
    Middle,
    /// Natural size at the cell end.
    End,
}

/// Grid placement of a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// First column.
    pub column: usize,
    /// First row.
    pub row: usize,
    /// Columns covered, at least 1.
    pub column_span: usize,
    /// Rows covered, at least 1.
    pub row_span: usize,
    /// Horizontal placement in the cell.
    pub horizontal: CellAlign,
    /// Vertical placement in the cell.
    pub vertical: CellAlign,
}

impl Anchor {
    /// A single cell, filled.
    pub fn cell(column: usize, row: usize) -> Self {
        Self::spanning(column, row, 1, 1)
    }

    /// A block of cells, filled.
    pub fn spanning(column: usize, row: usize, column_span: usize, row_span: usize) -> Self {
        Self {
            column,
            row,
            column_span: column_span.max(1),
            row_span: row_span.max(1),
            horizontal: CellAlign::Fill,
            vertical: CellAlign::Fill,
        }
    }

    /// Set the in-cell alignment.
    pub fn with_align(mut self, horizontal: CellAlign, vertical: CellAlign) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }
}

/// Arrangement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// Children along one axis, or overlapping for [`Alignment::None`].
    Box(Alignment),
    /// Children in a fixed number of columns.
    Grid {
        /// Column count, at least 1.
        columns: usize,
    },
}

/// Layout of a container's children.
///
/// The arrangement is chosen at construction; only the size policy, margins
/// and spacing can change afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Arrangement.
    kind: LayoutKind,
    /// Sizing behaviour.
    size_policy: SizePolicy,
    /// Space between the container edge and the children.
    inner_margin: Margin,
    /// Space reserved outside the children block, inside the container.
    outer_margin: Margin,
    /// Gap between adjacent children.
    spacing: f32,
}

impl Layout {
    /// Build a layout of the given kind with default parameters.
    fn with_kind(kind: LayoutKind) -> Self {
        Self {
            kind,
            size_policy: SizePolicy::Inherit,
            inner_margin: Margin::ZERO,
            outer_margin: Margin::ZERO,
            spacing: 0.0,
        }
    }

    /// Children left to right.
    pub fn horizontal() -> Self {
        Self::with_kind(LayoutKind::Box(Alignment::Horizontal))
    }

    /// Children top to bottom.
    pub fn vertical() -> Self {
        Self::with_kind(LayoutKind::Box(Alignment::Vertical))
    }

    /// Children overlapping at the content origin.
    pub fn stack() -> Self {
        Self::with_kind(LayoutKind::Box(Alignment::None))
    }

    /// Children in `columns` columns, row-major.
    pub fn grid(columns: usize) -> Self {
        Self::with_kind(LayoutKind::Grid {
            columns: columns.max(1),
        })
    }

    /// Set the size policy.
    pub fn with_policy(mut self, policy: SizePolicy) -> Self {
        self.size_policy = policy;
        self
    }

    /// Set the inner margin.
    pub fn with_inner_margin(mut self, margin: Margin) -> Self {
        self.inner_margin = margin;
        self
    }

    /// Set the outer margin.
    pub fn with_outer_margin(mut self, margin: Margin) -> Self {
        self.outer_margin = margin;
        self
    }

    /// Set the gap between children.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    /// Arrangement.
    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// Box alignment; grids report [`Alignment::None`].
    pub fn alignment(&self) -> Alignment {
        match self.kind {
            LayoutKind::Box(a) => a,
            LayoutKind::Grid { .. } => Alignment::None,
        }
    }

    /// Sizing behaviour as configured, before inheritance.
    pub fn size_policy(&self) -> SizePolicy {
        self.size_policy
    }

    /// Change the sizing behaviour.
    pub fn set_size_policy(&mut self, policy: SizePolicy) {
        self.size_policy = policy;
    }

    /// Inner margin.
    pub fn inner_margin(&self) -> Margin {
        self.inner_margin
    }

    /// Outer margin.
    pub fn outer_margin(&self) -> Margin {
        self.outer_margin
    }

    /// Gap between children.
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Both margins combined.
    pub(crate) fn margins(&self) -> Margin {
        self.inner_margin + self.outer_margin
    }
}
