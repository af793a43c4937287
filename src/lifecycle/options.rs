/*!
 * Launch Options
 */

/// How `launch` should treat an application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Construct a new instance even if one is already tracked
    pub force_new: bool,
    /// Open a window; None means "yes, except for the default application"
    pub create_window: Option<bool>,
    /// Open another window even if the instance already has a visible one
    pub new_window: bool,
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Background activation without any window
    #[inline]
    #[must_use]
    pub fn headless(mut self) -> Self {
        self.create_window = Some(false);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_window(mut self) -> Self {
        self.create_window = Some(true);
        self
    }

    #[inline]
    #[must_use]
    pub fn new_window(mut self) -> Self {
        self.create_window = Some(true);
        self.new_window = true;
        self
    }

    pub(crate) fn wants_window(&self, is_default_app: bool) -> bool {
        self.create_window.unwrap_or(!is_default_app)
    }
}
