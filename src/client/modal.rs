//! Modal dialogs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Info,
    Feedback,
    /// Sign-in prompt
    Auth,
    Upload,
}

impl Modal {
    /// Escape closes the first open modal in this order
    pub const DISMISS_ORDER: [Modal; 4] =
        [Modal::Upload, Modal::Auth, Modal::Feedback, Modal::Info];
}

#[derive(Debug, Default, Clone)]
pub struct Modals {
    info: bool,
    feedback: bool,
    auth: bool,
    upload: bool,
}

impl Modals {
    fn slot(&mut self, modal: Modal) -> &mut bool {
        match modal {
            Modal::Info => &mut self.info,
            Modal::Feedback => &mut self.feedback,
            Modal::Auth => &mut self.auth,
            Modal::Upload => &mut self.upload,
        }
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        match modal {
            Modal::Info => self.info,
            Modal::Feedback => self.feedback,
            Modal::Auth => self.auth,
            Modal::Upload => self.upload,
        }
    }

    pub fn any_open(&self) -> bool {
        self.info || self.feedback || self.auth || self.upload
    }

    pub fn open(&mut self, modal: Modal) {
        *self.slot(modal) = true;
    }

    pub fn close(&mut self, modal: Modal) {
        *self.slot(modal) = false;
    }

    /// Close the topmost open modal, if any
    pub fn dismiss_top(&mut self) -> Option<Modal> {
        let top = Modal::DISMISS_ORDER.into_iter().find(|m| self.is_open(*m))?;
        self.close(top);
        Some(top)
    }
}
