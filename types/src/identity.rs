//! Identity capability consumed by boundary adapters.
//!
//! Adapters never ask what concrete wrapper they were handed. They ask the
//! value for the tag and primitive it stands for, so smart pointers and
//! lazily-loaded proxies can forward to whatever they wrap.

use std::rc::Rc;
use std::sync::Arc;

use crate::descriptor::TagDescriptor;
use crate::dynamic::DynTagged;
use crate::primitive::{Primitive, RawValue};
use crate::tag::{Marker, TypeTag};
use crate::value::Tagged;

pub trait EffectiveIdentity {
    fn effective_tag(&self) -> TypeTag;

    fn effective_value(&self) -> RawValue;

    fn effective_descriptor(&self) -> TagDescriptor {
        TagDescriptor::new(self.effective_value().kind(), self.effective_tag())
    }
}

impl<P: Primitive, T: Marker> EffectiveIdentity for Tagged<P, T> {
    fn effective_tag(&self) -> TypeTag {
        TypeTag::of::<T>()
    }

    fn effective_value(&self) -> RawValue {
        self.value().clone().into_raw()
    }

    fn effective_descriptor(&self) -> TagDescriptor {
        TagDescriptor::of::<P, T>()
    }
}

impl<P: Primitive> EffectiveIdentity for DynTagged<P> {
    fn effective_tag(&self) -> TypeTag {
        self.tag()
    }

    fn effective_value(&self) -> RawValue {
        self.value().clone().into_raw()
    }
}

impl EffectiveIdentity for DynTagged<RawValue> {
    fn effective_tag(&self) -> TypeTag {
        self.tag()
    }

    fn effective_value(&self) -> RawValue {
        self.value().clone()
    }
}

macro_rules! forward_identity {
    ($($wrapper:ty),+) => {
        $(
            impl<E: EffectiveIdentity + ?Sized> EffectiveIdentity for $wrapper {
                fn effective_tag(&self) -> TypeTag {
                    (**self).effective_tag()
                }

                fn effective_value(&self) -> RawValue {
                    (**self).effective_value()
                }

                fn effective_descriptor(&self) -> TagDescriptor {
                    (**self).effective_descriptor()
                }
            }
        )+
    };
}

forward_identity!(&E, Box<E>, Rc<E>, Arc<E>);
