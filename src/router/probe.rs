//! Support code for `#[routes]`
//!
//! `#[routes]` cannot see whether its type also carries `#[router]`, so it
//! asks through method resolution: `(&&Probe::<T>::new()).router_spec()`
//! picks [`ViaDecl`] when `T: RouterDecl` and falls back to [`ViaFallback`]
//! otherwise. The mount then reports the missing declaration.

use crate::spec::{RouterDecl, RouterSpec};
use std::marker::PhantomData;

pub struct Probe<T>(PhantomData<T>);

impl<T> Probe<T> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Probe(PhantomData)
    }
}

pub trait ViaDecl {
    fn router_spec(&self) -> Option<RouterSpec>;
}

impl<T: RouterDecl> ViaDecl for &Probe<T> {
    fn router_spec(&self) -> Option<RouterSpec> {
        Some(T::router_spec())
    }
}

pub trait ViaFallback {
    fn router_spec(&self) -> Option<RouterSpec>;
}

impl<T> ViaFallback for Probe<T> {
    fn router_spec(&self) -> Option<RouterSpec> {
        None
    }
}
