use std::path::PathBuf ;
use std::process::ExitCode ;

use anyhow::{ anyhow, Context, Result };
use clap::Parser ;
use tracing_subscriber::EnvFilter ;
use wasmtime::{ Config, Engine };

use wasm_minimal_protocol::host::{ CallOutcome, Plugin };

#[derive( Parser, Debug )]
#[command( name = "wasm-minimal-protocol", version, about = "Call a function exported by a wasm minimal protocol plugin" )]
struct Args {
	/// Plugin module (`.wasm` or `.wat`).
	plugin: PathBuf,
	/// Exported function to call.
	#[arg( required_unless_present = "list" )]
	function: Option<String>,
	/// Arguments, each passed as its UTF-8 bytes.
	args: Vec<String>,
	/// Fuel given to the call. Enables fuel metering.
	#[arg( long )]
	fuel: Option<u64>,
	/// Print the callable functions and exit.
	#[arg( long )]
	list: bool,
}

const EXIT_FAILURE: u8 = 1 ;
const EXIT_ABORTED: u8 = 2 ;

fn main() -> ExitCode {

	tracing_subscriber::fmt()
		.with_env_filter( EnvFilter::from_default_env() )
		.with_writer( std::io::stderr )
		.init();

	match run( Args::parse() ) {
		Ok( code ) => code,
		Err( err ) => {
			eprintln!( "error: {err:#}" );
			ExitCode::from( EXIT_FAILURE )
		},
	}

}

fn run( args: Args ) -> Result<ExitCode> {

	let mut config = Config::new();
	config.consume_fuel( args.fuel.is_some() );
	let engine = Engine::new( &config ).map_err(| err | anyhow!( "failed to create engine: {err}" ))?;

	let plugin = Plugin::from_file( &engine, &args.plugin, () )
		.with_context(|| format!( "failed to load {}", args.plugin.display() ))?;

	if args.list {
		plugin.functions().for_each(| name | println!( "{name}" ));
		return Ok( ExitCode::SUCCESS )
	}

	let function = args.function.context( "no function given" )?;
	let plugin = match args.fuel {
		Some( fuel ) => plugin.with_fuel_limiter( move | _, _, _ | fuel ),
		None => plugin,
	};
	let mut instance = plugin.instantiate().map_err(| err | anyhow!( "failed to instantiate plugin: {err}" ))?;

	let call_args = args.args.iter().map( String::as_bytes ).collect::<Vec<_>>();
	let outcome = instance.call( &function, &call_args )
		.with_context(|| format!( "failed to call {function}" ))?;
	tracing::debug!( record = ?instance.last_call(), "call finished" );

	let text = outcome.payload_lossy().unwrap_or_default();
	Ok( match &outcome {
		CallOutcome::Success( _ ) => {
			println!( "{text}" );
			ExitCode::SUCCESS
		},
		CallOutcome::Failure( _ ) => {
			eprintln!( "{text}" );
			ExitCode::from( EXIT_FAILURE )
		},
		CallOutcome::NoPayload { status } => {
			eprintln!( "{function} returned {status} without a diagnostic" );
			ExitCode::from( EXIT_FAILURE )
		},
		CallOutcome::Aborted( trap ) => {
			eprintln!( "{function} aborted: {trap}" );
			ExitCode::from( EXIT_ABORTED )
		},
	})

}
