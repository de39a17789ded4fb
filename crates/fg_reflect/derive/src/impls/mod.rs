// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod serializable;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use auto_register::get_auto_register_impl;
pub(crate) use serializable::impl_serializable;
