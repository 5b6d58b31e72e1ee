use crate::{events::NoopEventLogger, EventLogger, Resolver};

/// Configuration for [`Resolver`].
pub struct ResolverConfig<'a> {
    pub(crate) event_logger: Box<dyn EventLogger + Send + Sync + 'a>,
}

impl<'a> ResolverConfig<'a> {
    /// Create a default configuration that drops all events.
    ///
    /// ```
    /// # use muton::ResolverConfig;
    /// ResolverConfig::new();
    /// ```
    pub fn new() -> Self {
        ResolverConfig {
            event_logger: Box::new(NoopEventLogger),
        }
    }

    /// Set event logger to receive decisions and rejected instructions.
    ///
    /// ```
    /// # use muton::ResolverConfig;
    /// let mut config = ResolverConfig::new();
    /// config.event_logger(|event: muton::Event| {
    ///   println!("{:?}", event);
    /// });
    /// ```
    pub fn event_logger(
        &mut self,
        event_logger: impl EventLogger + Send + Sync + 'a,
    ) -> &mut Self {
        self.event_logger = Box::new(event_logger);
        self
    }

    /// Create a new [`Resolver`] using the specified configuration.
    ///
    /// ```
    /// # use muton::{ResolverConfig, Resolver};
    /// let resolver: Resolver = ResolverConfig::new().to_resolver();
    /// ```
    pub fn to_resolver(self) -> Resolver<'a> {
        Resolver::new(self)
    }
}

impl Default for ResolverConfig<'_> {
    fn default() -> Self {
        Self::new()
    }
}
