use once_cell::sync::{Lazy, OnceCell};
use std::sync::Arc;

use crate::codec::DecodeError;
use crate::constants::{USER_TAG_COUNT, USER_TAG_FIRST};
use crate::message::{Portable, PortableMessage, WireMessage};

/// Constructs a message from a full inbound frame, starting at the tag
/// byte. Factories are shared across connections and invoked concurrently.
pub type MessageFactory =
    Arc<dyn Fn(&[u8]) -> Result<Arc<dyn WireMessage>, DecodeError> + Send + Sync>;

/// Registration failures. Both are caller errors surfaced at initialization
/// time and are not retried.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// The tag lies outside the user window.
    OutOfRange { tag: i8 },

    /// Two different identifiers competed for one tag slot. This means two
    /// independently developed extensions collide; it is never resolved by
    /// overwriting.
    DuplicateAssignment {
        tag: i8,
        existing: String,
        rejected: String,
    },
}

struct Registration {
    id: &'static str,
    factory: MessageFactory,
}

/// Table mapping user-window tags to message factories.
///
/// A slot is claimed atomically on first registration and its identifier
/// never changes afterwards: re-registering the same identifier is a no-op
/// (independent initializers may race freely), a different identifier is
/// rejected. Lookups are lock-free reads and can only observe fully
/// published registrations.
///
/// The table is an ordinary value so tests can run against a private
/// instance; transports share the one process-wide table behind
/// [`TypeRegistry::global`].
pub struct TypeRegistry {
    slots: [OnceCell<Registration>; USER_TAG_COUNT],
}

static GLOBAL_REGISTRY: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::new);

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| OnceCell::new()),
        }
    }

    /// The registry shared by every connection in this process.
    pub fn global() -> &'static TypeRegistry {
        &GLOBAL_REGISTRY
    }

    /// Whether `tag` falls inside the registrable user window.
    pub fn is_user_tag(tag: i8) -> bool {
        tag >= USER_TAG_FIRST && tag < USER_TAG_FIRST + USER_TAG_COUNT as i8
    }

    fn slot(&self, tag: i8) -> Result<&OnceCell<Registration>, RegistryError> {
        if !Self::is_user_tag(tag) {
            return Err(RegistryError::OutOfRange { tag });
        }
        Ok(&self.slots[(tag - USER_TAG_FIRST) as usize])
    }

    /// Claims `tag` for `id`, storing the factory that will construct
    /// inbound messages carrying that tag.
    ///
    /// Re-registering the same identifier at the same tag succeeds without
    /// touching the slot. A different identifier fails with
    /// [`RegistryError::DuplicateAssignment`] naming both parties.
    pub fn register(
        &self,
        id: &'static str,
        tag: i8,
        factory: MessageFactory,
    ) -> Result<(), RegistryError> {
        let slot = self.slot(tag)?;

        let mut claimed = false;
        let registration = slot.get_or_init(|| {
            claimed = true;
            Registration { id, factory }
        });

        if claimed {
            tracing::debug!(tag, id, "claimed user message tag");
            return Ok(());
        }

        if registration.id == id {
            // Same identifier, already registered: idempotent no-op.
            return Ok(());
        }

        Err(RegistryError::DuplicateAssignment {
            tag,
            existing: registration.id.to_string(),
            rejected: id.to_string(),
        })
    }

    /// Registers the [`PortableMessage`] variant for domain type `B` under
    /// `tag`, using `B::PORTABLE_ID` as the identifier.
    pub fn register_portable<B: Portable>(&self, tag: i8) -> Result<(), RegistryError> {
        self.register(
            B::PORTABLE_ID,
            tag,
            Arc::new(|frame: &[u8]| {
                PortableMessage::<B>::from_frame(frame)
                    .map(|msg| Arc::new(msg) as Arc<dyn WireMessage>)
            }),
        )
    }

    /// Returns the factory registered for `tag`, or `None` for a slot no
    /// one has claimed. An unclaimed slot is an expected outcome, distinct
    /// from a tag outside the window.
    pub fn lookup(&self, tag: i8) -> Result<Option<MessageFactory>, RegistryError> {
        Ok(self.slot(tag)?.get().map(|r| Arc::clone(&r.factory)))
    }

    /// Resolves `tag` and constructs a message from `frame`.
    ///
    /// Fails with [`DecodeError::UnknownType`] when no factory can handle
    /// the tag — a tag that passed the window check but was never
    /// registered, typically because the sending process loaded a different
    /// extension set.
    pub fn resolve(&self, tag: i8, frame: &[u8]) -> Result<Arc<dyn WireMessage>, DecodeError> {
        let factory = match self.slot(tag) {
            Ok(slot) => slot.get().map(|r| &r.factory),
            // Tags outside the window have no resolver by definition. The
            // dispatch layer range-checks first, so this arm is defensive.
            Err(_) => None,
        };

        match factory {
            Some(factory) => factory(frame),
            None => Err(DecodeError::UnknownType { tag }),
        }
    }
}
