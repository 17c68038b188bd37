use hostmap_compose::Cleanup;

/// Arguments to forward to the wrapped CLI, plus the files that must be
/// removed once it has exited.
#[derive(Debug)]
pub struct Command {
    args: Vec<String>,
    cleanup: Option<Cleanup>,
}

impl Command {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            cleanup: None,
        }
    }

    pub fn with_cleanup(args: Vec<String>, cleanup: Cleanup) -> Self {
        Self {
            args,
            cleanup: (!cleanup.is_empty()).then_some(cleanup),
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn cleanup(&self) -> Option<&Cleanup> {
        self.cleanup.as_ref()
    }

    pub fn into_parts(self) -> (Vec<String>, Option<Cleanup>) {
        (self.args, self.cleanup)
    }

    /// Runs the cleanup; call after the forwarded process has exited.
    pub fn finish(self) {
        if let Some(cleanup) = self.cleanup {
            cleanup.release();
        }
    }
}
