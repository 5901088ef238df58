//! Host half of the protocol: loading plugin modules and calling their exports.
//!
//! The host stages a call's arguments, provides the two primitives under
//! [`IMPORT_MODULE`]( crate::abi::IMPORT_MODULE ), and checks that the guest
//! used them correctly:
//!
//! - the arguments may be fetched at most once, into memory the guest owns;
//! - the result must be sent exactly once unless the function failed without
//! 	being able to allocate, in which case it must not be sent at all;
//! - a trap aborts the call and poisons the instance.
//!
//! ```
//! use wasm_minimal_protocol::host::{ CallOutcome, Plugin };
//! use wasmtime::Engine ;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::default();
//! let mut plugin = Plugin::new( &engine, r#"(module
//! 	(import "typst_env" "wasm_minimal_protocol_write_args_to_buffer" (func $write (param i32)))
//! 	(import "typst_env" "wasm_minimal_protocol_send_result_to_host" (func $send (param i32 i32)))
//! 	(memory (export "memory") 1)
//! 	;; echoes its only argument
//! 	(func (export "echo") (param $len i32) (result i32)
//! 		(call $write (i32.const 0))
//! 		(call $send (i32.const 0) (local.get $len))
//! 		(i32.const 0))
//! )"#, () )?.instantiate()?;
//!
//! let outcome = plugin.call( "echo", &[ b"hello" ])?;
//! assert!( matches!( outcome, CallOutcome::Success( ref payload ) if payload == b"hello" ));
//! # Ok(())
//! # }
//! ```

mod linker ;
mod outcome ;
mod plugin ;
mod plugin_instance ;
mod validate ;

pub use linker::ProtocolViolation ;
pub use outcome::{ CallOutcome, CallRecord };
pub use plugin::{ MemoryLimiter, Plugin };
pub use plugin_instance::{ DispatchError, PluginInstance };
pub use validate::LoadError ;
