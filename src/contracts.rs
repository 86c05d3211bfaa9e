//! Centralized Contract Definitions (§6.1)
//!
//! The two on-chain contract surfaces the solver consumes, defined with
//! alloy's `sol!` macro the way the wider codebase already does for its
//! ABI bindings.
//!
//! Author: AI-Generated
//! Created: 2026-02-14

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

sol! {
    #[sol(rpc)]
    interface IOrderbook {
        struct IoV3 {
            address token;
            uint8 decimals;
            uint256 vaultId;
        }

        struct EvaluableV3 {
            address interpreter;
            address store;
            bytes bytecode;
        }

        struct OrderV3 {
            address owner;
            EvaluableV3 evaluable;
            IoV3[] validInputs;
            IoV3[] validOutputs;
            bytes32 nonce;
        }

        struct SignedContextV1 {
            address signer;
            uint256[] context;
            bytes signature;
        }

        struct Quote2Config {
            OrderV3 order;
            uint256 inputIOIndex;
            uint256 outputIOIndex;
            SignedContextV1[] signedContext;
        }

        struct ClearConfig {
            uint256 aliceInputIOIndex;
            uint256 aliceOutputIOIndex;
            uint256 bobInputIOIndex;
            uint256 bobOutputIOIndex;
            bytes32 aliceBountyVaultId;
            bytes32 bobBountyVaultId;
        }

        function quote2(Quote2Config quoteConfig)
            external
            view
            returns (bool exists, bytes32 outputMax, bytes32 ioRatio);

        function clear3(
            OrderV3 alice,
            OrderV3 bob,
            ClearConfig clearConfig,
            SignedContextV1[] aliceSignedContext,
            SignedContextV1[] bobSignedContext
        ) external;
    }
}

sol! {
    #[sol(rpc)]
    interface IArb {
        struct EvaluableV3 {
            address interpreter;
            address store;
            bytes bytecode;
        }

        struct TaskV1 {
            EvaluableV3 evaluable;
            uint256[] signedContext;
        }

        struct TakeOrdersConfigV3 {
            uint256 minimumInput;
            uint256 maximumInput;
            uint256 maximumIORatio;
            bytes32[] orders;
            bytes data;
        }

        function arb3(address orderBook, TakeOrdersConfigV3 takeOrders, TaskV1 task) external payable returns (uint256 profit);
        function arb4(address orderBook, TakeOrdersConfigV3 takeOrders, TaskV1 task) external payable returns (uint256 profit);
    }
}
