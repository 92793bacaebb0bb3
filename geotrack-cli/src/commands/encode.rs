//! Encode command - print the outbound payload for a coordinate.

use geotrack::codec::encode_coordinate;
use geotrack::position::Coordinate;

use crate::error::CliError;

/// Arguments for the encode command.
pub struct EncodeArgs {
    pub lat: f64,
    pub lon: f64,
    pub accuracy: Option<f64>,
}

/// Run the encode command.
pub fn run(args: EncodeArgs) -> Result<(), CliError> {
    println!("{}", payload(&args)?);
    Ok(())
}

fn payload(args: &EncodeArgs) -> Result<String, CliError> {
    let mut coordinate = Coordinate::new(args.lat, args.lon);
    if let Some(accuracy) = args.accuracy {
        coordinate = coordinate.with_accuracy(accuracy);
    }
    Ok(encode_coordinate(&coordinate)?)
}
