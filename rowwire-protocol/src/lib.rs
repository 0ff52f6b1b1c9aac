//! Wire format of schemas, row blocks and statuses.
pub mod config;
pub mod error;
pub mod message;
pub mod rowblock;
pub mod schema;
pub mod status;

pub use config::WireConfig;
pub use error::{Error, ErrorMsg, Result};
pub use message::WireMessage;
pub use rowblock::{
    add_row_to_row_block, extract_rows_from_row_block, DecodeState, RowBlockDecoder,
    RowBlockEncoder, RowBlockMessage,
};
pub use schema::{
    column_pbs_to_schema, column_schema_from_pb, column_schema_to_pb, schema_to_column_pbs,
    ColumnSchemaPB, SchemaMessage,
};
pub use status::{AppStatus, AppStatusCode};
