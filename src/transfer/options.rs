/// Configuration options for a transfer run.
///
/// Every step of the pipeline except transplanting itself can be switched
/// off.
///
/// # Examples
///
/// ```rust
/// use slidegraft::TransferOptions;
///
/// // Create with defaults
/// let options = TransferOptions::default();
/// assert!(options.ungroup && options.recenter);
///
/// // Or customize
/// let options = TransferOptions::new()
///     .with_ungroup(false)
///     .with_clone_layout_placeholders(true);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    /// Dissolve groups on each content slide before copying
    pub ungroup: bool,
    /// Center the copied shapes on the template canvas
    pub recenter: bool,
    /// Give copied shapes fresh ids that are unique on the target slide
    pub renumber_shape_ids: bool,
    /// Copy the layout's placeholders onto each new slide
    pub clone_layout_placeholders: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            ungroup: true,
            recenter: true,
            renumber_shape_ids: true,
            clone_layout_placeholders: false,
        }
    }
}

impl TransferOptions {
    /// Create a new `TransferOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether groups are dissolved before copying.
    ///
    /// When disabled, groups are copied as opaque shapes and are left out of
    /// the centering bounding box.
    #[inline]
    pub fn with_ungroup(mut self, ungroup: bool) -> Self {
        self.ungroup = ungroup;
        self
    }

    /// Set whether copied content is centered on the slide.
    #[inline]
    pub fn with_recenter(mut self, recenter: bool) -> Self {
        self.recenter = recenter;
        self
    }

    /// Set whether copied shapes get fresh shape ids.
    #[inline]
    pub fn with_renumber_shape_ids(mut self, renumber: bool) -> Self {
        self.renumber_shape_ids = renumber;
        self
    }

    /// Set whether new slides start with the layout's placeholders.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use slidegraft::TransferOptions;
    ///
    /// let options = TransferOptions::new().with_clone_layout_placeholders(true);
    /// assert!(options.clone_layout_placeholders);
    /// ```
    #[inline]
    pub fn with_clone_layout_placeholders(mut self, clone: bool) -> Self {
        self.clone_layout_placeholders = clone;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TransferOptions::new();
        assert!(options.ungroup);
        assert!(options.recenter);
        assert!(options.renumber_shape_ids);
        assert!(!options.clone_layout_placeholders);
    }

    #[test]
    fn test_builders() {
        let options = TransferOptions::new()
            .with_ungroup(false)
            .with_recenter(false)
            .with_renumber_shape_ids(false)
            .with_clone_layout_placeholders(true);
        assert_eq!(
            options,
            TransferOptions {
                ungroup: false,
                recenter: false,
                renumber_shape_ids: false,
                clone_layout_placeholders: true,
            }
        );
    }
}
