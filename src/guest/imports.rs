/// The two primitives the host provides to the guest.
///
/// Both are synchronous and not reentrant: the host finishes writing (or
/// copying out) before control returns to the guest.
pub trait HostImports {
	/// Asks the host to fill `buffer` with the concatenated arguments of the
	/// current call. `buffer` must be exactly as long as their summed lengths.
	fn write_args_to_buffer( &self, buffer: &mut [u8] );
	/// Hands `result` to the host as the payload of the current call.
	fn send_result_to_host( &self, result: &[u8] );
}

impl<H: HostImports + ?Sized> HostImports for &H {
	fn write_args_to_buffer( &self, buffer: &mut [u8] ) { ( **self ).write_args_to_buffer( buffer ) }
	fn send_result_to_host( &self, result: &[u8] ) { ( **self ).send_result_to_host( result ) }
}

/// The host environment a plugin module is instantiated in.
///
/// On `wasm32` this calls the imports declared under
/// [`IMPORT_MODULE`]( crate::abi::IMPORT_MODULE ). Elsewhere it forwards to the
/// host installed for the current thread with [`install_host`].
#[derive( Copy, Clone, Debug, Default )]
pub struct TypstEnv ;

#[cfg( target_arch = "wasm32" )]
mod ffi {
	// The literals must match `crate::abi`; `link` attributes don't accept constants.
	#[link( wasm_import_module = "typst_env" )]
	unsafe extern "C" {
		#[link_name = "wasm_minimal_protocol_send_result_to_host"]
		pub fn send_result_to_host( ptr: *const u8, len: usize );
		#[link_name = "wasm_minimal_protocol_write_args_to_buffer"]
		pub fn write_args_to_buffer( ptr: *mut u8 );
	}
}

#[cfg( target_arch = "wasm32" )]
impl HostImports for TypstEnv {
	fn write_args_to_buffer( &self, buffer: &mut [u8] ) {
		// SAFETY: `buffer` is a live, exclusively borrowed region of exactly the
		// summed argument length, which is all the host writes.
		unsafe { ffi::write_args_to_buffer( buffer.as_mut_ptr() ) }
	}
	fn send_result_to_host( &self, result: &[u8] ) {
		// SAFETY: the host only reads `result.len()` bytes and copies them out
		// before returning, while `result` is still borrowed.
		unsafe { ffi::send_result_to_host( result.as_ptr(), result.len() ) }
	}
}

#[cfg( not( target_arch = "wasm32" ))]
pub use native::{ install_host, HostGuard };

#[cfg( not( target_arch = "wasm32" ))]
mod native {
	use std::cell::RefCell ;
	use std::rc::Rc ;

	use super::{ HostImports, TypstEnv };

	thread_local! {
		static INSTALLED: RefCell<Option<Rc<dyn HostImports>>> = const { RefCell::new( None ) };
	}

	/// Routes [`TypstEnv`] calls on this thread to `host` until the guard drops.
	///
	/// Lets plugin code and `#[wasm_func]` exports run natively, e.g. in unit
	/// tests. Guards nest; dropping one restores the previously installed host.
	pub fn install_host( host: Rc<dyn HostImports> ) -> HostGuard {
		let previous = INSTALLED.with_borrow_mut(| installed | installed.replace( host ));
		HostGuard { previous }
	}

	/// Restores the previously installed host on drop.
	#[must_use = "the host is uninstalled as soon as the guard is dropped"]
	pub struct HostGuard {
		previous: Option<Rc<dyn HostImports>>,
	}

	impl Drop for HostGuard {
		fn drop( &mut self ) {
			let previous = self.previous.take();
			INSTALLED.with_borrow_mut(| installed | *installed = previous );
		}
	}

	impl std::fmt::Debug for HostGuard {
		fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
			f.debug_struct( "HostGuard" )
				.field( "previous", &self.previous.as_ref().map(| _ | "<host>" ))
				.finish()
		}
	}

	fn installed() -> Rc<dyn HostImports> {
		match INSTALLED.with_borrow( Clone::clone ) {
			Some( host ) => host,
			None => panic!( "no protocol host installed on this thread; call `install_host` first" ),
		}
	}

	impl HostImports for TypstEnv {
		fn write_args_to_buffer( &self, buffer: &mut [u8] ) { installed().write_args_to_buffer( buffer ) }
		fn send_result_to_host( &self, result: &[u8] ) { installed().send_result_to_host( result ) }
	}
}
