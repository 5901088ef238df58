#[allow( dead_code )]
mod fixtures {

	use once_cell::sync::Lazy ;
	use wasm_minimal_protocol::host::{ Plugin, PluginInstance };
	use wasmtime::Engine ;

	/// Shared by every test that doesn't need a configured engine.
	pub static ENGINE: Lazy<Engine> = Lazy::new( Engine::default );

	pub fn path( name: &str ) -> std::path::PathBuf {
		std::path::PathBuf::from( env!( "CARGO_MANIFEST_DIR" ))
			.join( "tests" )
			.join( "fixtures" )
			.join( format!( "{name}.wat" ))
	}

	pub fn plugin<Ctx: Send + 'static>( name: &str, engine: &Engine, context: Ctx ) -> Plugin<Ctx> {
		Plugin::from_file( engine, path( name ), context )
			.unwrap_or_else(| err | panic!( "Fixture {} failed to load: {}", name, err ))
	}

	/// A fresh instance of the `protocol` fixture on the shared engine.
	pub fn protocol() -> PluginInstance<()> {
		plugin( "protocol", &ENGINE, () )
			.instantiate()
			.expect( "Failed to instantiate plugin" )
	}

}
