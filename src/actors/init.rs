use cid::Cid;
use serde_tuple::{Deserialize_tuple, Serialize_tuple};

use crate::address::Address;
use crate::encoding::RawBytes;
use crate::message::MethodNum;

/// The init actor, which creates every other actor.
pub const INIT_ACTOR: Address = Address::new_id(1);

pub const CONSTRUCTOR: MethodNum = 1;
pub const EXEC: MethodNum = 2;

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ConstructorParams {
	pub network_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ExecParams {
	pub code_cid: Cid,
	pub constructor_params: RawBytes,
}

#[derive(Debug, Clone, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ExecReturn {
	pub id_address: Address,
	pub robust_address: Address,
}
