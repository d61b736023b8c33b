//! Contract call declarations for the ENS registry, resolvers and tokens.

use alloy::primitives::{keccak256, B256};

alloy::sol! {
    function resolver(bytes32 node) external view returns (address);
    function addr(bytes32 node) external view returns (address);
    function supportsInterface(bytes4 interfaceId) external view returns (bool);
    function resolve(bytes name, bytes data) external view returns (bytes);
    function resolverType() external view returns (string);
    function version() external view returns (string);
    function name() external view returns (string);
    function symbol() external view returns (string);
    function decimals() external view returns (uint8);
    function totalSupply() external view returns (uint256);
}

/// Older contracts that return fixed-size values where the calls above
/// return strings.
pub mod legacy {
    alloy::sol! {
        function resolverType() external view returns (uint256);
        function version() external view returns (uint256);
        function name() external view returns (bytes32);
        function symbol() external view returns (bytes32);
    }
}

/// Compute the ENS namehash for a domain name (EIP-137).
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(buf);
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::hex;
    use alloy::sol_types::SolCall;

    #[test]
    fn test_namehash() {
        assert_eq!(namehash(""), B256::ZERO);
        assert_eq!(
            hex::encode(namehash("eth")),
            "93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
        );
        assert_eq!(
            hex::encode(namehash("foo.eth")),
            "de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f"
        );
    }

    #[test]
    fn test_selectors() {
        assert_eq!(hex::encode(resolverCall::SELECTOR), "0178b8bf");
        assert_eq!(hex::encode(addrCall::SELECTOR), "3b3b57de");
        assert_eq!(hex::encode(supportsInterfaceCall::SELECTOR), "01ffc9a7");
        assert_eq!(hex::encode(resolveCall::SELECTOR), "9061b923");
        assert_eq!(hex::encode(nameCall::SELECTOR), "06fdde03");
        assert_eq!(hex::encode(legacy::nameCall::SELECTOR), "06fdde03");
        assert_eq!(hex::encode(totalSupplyCall::SELECTOR), "18160ddd");
    }
}
