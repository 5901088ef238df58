use wasm_minimal_protocol::host::{ LoadError, Plugin };

#[test]
fn load_error_unsupported_import() {
	match Plugin::from_file( &crate::fixtures::ENGINE, crate::fixtures::path( "foreign_import" ), () ) {
		Err( LoadError::UnsupportedImport { module, name }) => {
			assert_eq!( module, "wasi_snapshot_preview1" );
			assert_eq!( name, "fd_write" );
		},
		other => panic!( "Expected UnsupportedImport, found: {:#?}", other.map(| _ | "<Plugin>" )),
	}
}
