//! Runtime lifecycle tests.
//!
//! Drives the program through solana-program-test: the full
//! create / buy / request / execute sequence with real SPL vaults, plus the
//! settlement paths (claim-once, close gating, post-claim escrow) against a
//! pre-seeded claimed pool, since a winning draw cannot be forced through the
//! public flow.

use anchor_lang::{
    AccountDeserialize, AnchorSerialize, Discriminator, Id, InstructionData, ToAccountMetas,
};
use anchor_spl::associated_token::{get_associated_token_address, AssociatedToken};
use anchor_spl::token::spl_token;
use prob_pool::state::{GlobalConfig, ProbPool};
use prob_pool::{ClaimAssetError, ClosePoolError, ExecuteBurnError};
use solana_program_test::{processor, tokio, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    account::Account,
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    instruction::{Instruction, InstructionError},
    program_option::COption,
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_program, sysvar,
    transaction::{Transaction, TransactionError},
};

// `processor!` wants independent slice and account-data lifetimes; anchor's
// generated entrypoint ties them together
fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let accounts =
        unsafe { std::mem::transmute::<&[AccountInfo<'_>], &[AccountInfo<'_>]>(accounts) };
    prob_pool::entry(program_id, accounts, instruction_data)
}

fn program_test() -> ProgramTest {
    ProgramTest::new("prob_pool", prob_pool::ID, processor!(process_instruction))
}

const FUNDING: u64 = 10_000_000_000;
const SEEDED: u64 = 100_000_000;

fn system_account(lamports: u64) -> Account {
    Account {
        lamports,
        data: vec![],
        owner: system_program::ID,
        executable: false,
        rent_epoch: 0,
    }
}

fn packed_mint(supply: u64, mint_authority: COption<Pubkey>) -> Account {
    let mut data = vec![0u8; spl_token::state::Mint::LEN];
    let mint = spl_token::state::Mint {
        mint_authority,
        supply,
        decimals: 0,
        is_initialized: true,
        freeze_authority: COption::None,
    };
    spl_token::state::Mint::pack(mint, &mut data).unwrap();
    Account {
        lamports: SEEDED,
        data,
        owner: spl_token::ID,
        executable: false,
        rent_epoch: 0,
    }
}

fn packed_token_account(mint: Pubkey, owner: Pubkey, amount: u64) -> Account {
    let mut data = vec![0u8; spl_token::state::Account::LEN];
    let token = spl_token::state::Account {
        mint,
        owner,
        amount,
        delegate: COption::None,
        state: spl_token::state::AccountState::Initialized,
        is_native: COption::None,
        delegated_amount: 0,
        close_authority: COption::None,
    };
    spl_token::state::Account::pack(token, &mut data).unwrap();
    Account {
        lamports: SEEDED,
        data,
        owner: spl_token::ID,
        executable: false,
        rent_epoch: 0,
    }
}

fn anchor_account<T: Discriminator + AnchorSerialize>(state: &T) -> Account {
    let mut data = T::DISCRIMINATOR.to_vec();
    state.serialize(&mut data).unwrap();
    Account {
        lamports: SEEDED,
        data,
        owner: prob_pool::ID,
        executable: false,
        rent_epoch: 0,
    }
}

async fn send(
    context: &mut ProgramTestContext,
    ix: Instruction,
    payer: &Keypair,
) -> Result<(), BanksClientError> {
    let blockhash = context.banks_client.get_latest_blockhash().await.unwrap();
    let tx = Transaction::new_signed_with_payer(
        &[ix],
        Some(&payer.pubkey()),
        &[payer],
        blockhash,
    );
    context.banks_client.process_transaction(tx).await
}

fn custom_error(err: BanksClientError) -> u32 {
    match err {
        BanksClientError::TransactionError(TransactionError::InstructionError(
            _,
            InstructionError::Custom(code),
        )) => code,
        e => panic!("expected custom program error, got {e:?}"),
    }
}

async fn token_balance(context: &mut ProgramTestContext, address: Pubkey) -> u64 {
    let account = context
        .banks_client
        .get_account(address)
        .await
        .unwrap()
        .expect("token account missing");
    spl_token::state::Account::unpack(&account.data).unwrap().amount
}

async fn pool_state(context: &mut ProgramTestContext, address: Pubkey) -> ProbPool {
    let account = context
        .banks_client
        .get_account(address)
        .await
        .unwrap()
        .expect("pool account missing");
    ProbPool::try_deserialize(&mut account.data.as_slice()).unwrap()
}

struct PoolPdas {
    config: Pubkey,
    fee_vault: Pubkey,
    pool: Pubkey,
    ptoken_mint: Pubkey,
    asset_vault: Pubkey,
    collateral_vault: Pubkey,
    pool_ptoken_vault: Pubkey,
}

fn derive_pdas(collateral_mint: &Pubkey, asset_mint: &Pubkey) -> PoolPdas {
    let (config, _) = Pubkey::find_program_address(&[b"config"], &prob_pool::ID);
    let (fee_vault, _) =
        Pubkey::find_program_address(&[b"vault", collateral_mint.as_ref()], &prob_pool::ID);
    let (pool, _) =
        Pubkey::find_program_address(&[b"pool", asset_mint.as_ref()], &prob_pool::ID);
    let (ptoken_mint, _) =
        Pubkey::find_program_address(&[b"mint", pool.as_ref()], &prob_pool::ID);
    let (asset_vault, _) = Pubkey::find_program_address(
        &[b"vault", asset_mint.as_ref(), pool.as_ref()],
        &prob_pool::ID,
    );
    let (collateral_vault, _) = Pubkey::find_program_address(
        &[b"vault", collateral_mint.as_ref(), pool.as_ref()],
        &prob_pool::ID,
    );
    let (pool_ptoken_vault, _) = Pubkey::find_program_address(
        &[b"vault", ptoken_mint.as_ref(), pool.as_ref()],
        &prob_pool::ID,
    );
    PoolPdas {
        config,
        fee_vault,
        pool,
        ptoken_mint,
        asset_vault,
        collateral_vault,
        pool_ptoken_vault,
    }
}

/// The seed scenario end to end: create a 10/10 pool, buy 4 ptokens for a
/// cost of 7, escrow and execute the burn, and check every vault balance and
/// pool counter along the way. Also checks `close_pool` is rejected while
/// the pool is unclaimed.
#[tokio::test]
async fn buy_and_burn_lifecycle() {
    let creator = Keypair::new();
    let buyer = Keypair::new();
    let collateral_mint = Pubkey::new_unique();
    let asset_mint = Pubkey::new_unique();
    let creator_asset = Pubkey::new_unique();
    let buyer_collateral = get_associated_token_address(&buyer.pubkey(), &collateral_mint);
    let pdas = derive_pdas(&collateral_mint, &asset_mint);

    let mut pt = program_test();
    pt.add_account(creator.pubkey(), system_account(FUNDING));
    pt.add_account(buyer.pubkey(), system_account(FUNDING));
    pt.add_account(collateral_mint, packed_mint(1_000_000, COption::None));
    pt.add_account(asset_mint, packed_mint(1, COption::None));
    pt.add_account(
        creator_asset,
        packed_token_account(asset_mint, creator.pubkey(), 1),
    );
    pt.add_account(
        buyer_collateral,
        packed_token_account(collateral_mint, buyer.pubkey(), 1_000),
    );
    let mut context = pt.start_with_context().await;

    // Protocol setup: 250/10000 swap fee, flat burn cost of 5
    let initialize = Instruction {
        program_id: prob_pool::ID,
        accounts: prob_pool::accounts::Initialize {
            authority: creator.pubkey(),
            config: pdas.config,
            collateral_mint,
            fee_vault: pdas.fee_vault,
            token_program: spl_token::ID,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: prob_pool::instruction::Initialize {
            swap_fee: 250,
            burn_cost: 5,
            fee_scalar: 10_000,
            collateral_min: 10,
            collateral_max: 1_000,
            ptoken_max: 500,
            ptoken_min: 2,
        }
        .data(),
    };
    send(&mut context, initialize, &creator).await.unwrap();

    let create_pool = Instruction {
        program_id: prob_pool::ID,
        accounts: prob_pool::accounts::CreatePool {
            creator: creator.pubkey(),
            config: pdas.config,
            asset_mint,
            creator_asset,
            pool: pdas.pool,
            ptoken_mint: pdas.ptoken_mint,
            asset_vault: pdas.asset_vault,
            collateral_vault: pdas.collateral_vault,
            pool_ptoken_vault: pdas.pool_ptoken_vault,
            collateral_mint,
            token_program: spl_token::ID,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: prob_pool::instruction::CreatePool {
            collateral_amount: 10,
            ptoken_amount: 10,
        }
        .data(),
    };
    send(&mut context, create_pool, &creator).await.unwrap();

    assert_eq!(token_balance(&mut context, pdas.asset_vault).await, 1);
    assert_eq!(token_balance(&mut context, pdas.pool_ptoken_vault).await, 10);
    let pool = pool_state(&mut context, pdas.pool).await;
    assert!(!pool.claimed);
    assert_eq!(pool.collateral_supply, 10);
    assert_eq!(pool.ptoken_supply, 10);
    assert_eq!(pool.outstanding_ptokens, 0);

    // Closing before the asset is won must be rejected
    let close_pool = Instruction {
        program_id: prob_pool::ID,
        accounts: prob_pool::accounts::ClosePool {
            creator: creator.pubkey(),
            config: pdas.config,
            pool: pdas.pool,
            collateral_mint,
            ptoken_mint: pdas.ptoken_mint,
            asset_mint,
            collateral_vault: pdas.collateral_vault,
            pool_ptoken_vault: pdas.pool_ptoken_vault,
            asset_vault: pdas.asset_vault,
            recipient: get_associated_token_address(&creator.pubkey(), &collateral_mint),
            token_program: spl_token::ID,
            associated_token_program: AssociatedToken::id(),
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: prob_pool::instruction::ClosePool {}.data(),
    };
    let err = send(&mut context, close_pool, &creator).await.unwrap_err();
    assert_eq!(custom_error(err), u32::from(ClosePoolError::InvalidState));

    // buy(4): k = 100, ceil(100 / 6) = 17, cost 7, fee 0
    let (user_ptoken_vault, _) = Pubkey::find_program_address(
        &[b"vault", pdas.ptoken_mint.as_ref(), buyer.pubkey().as_ref()],
        &prob_pool::ID,
    );
    let buy = Instruction {
        program_id: prob_pool::ID,
        accounts: prob_pool::accounts::Buy {
            buyer: buyer.pubkey(),
            config: pdas.config,
            pool: pdas.pool,
            collateral_mint,
            ptoken_mint: pdas.ptoken_mint,
            buyer_collateral,
            collateral_vault: pdas.collateral_vault,
            fee_vault: pdas.fee_vault,
            pool_ptoken_vault: pdas.pool_ptoken_vault,
            user_ptoken_vault,
            token_program: spl_token::ID,
            associated_token_program: AssociatedToken::id(),
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: prob_pool::instruction::Buy { ptoken_amount: 4 }.data(),
    };
    send(&mut context, buy, &buyer).await.unwrap();

    assert_eq!(token_balance(&mut context, user_ptoken_vault).await, 4);
    assert_eq!(token_balance(&mut context, pdas.pool_ptoken_vault).await, 6);
    assert_eq!(token_balance(&mut context, pdas.collateral_vault).await, 7);
    assert_eq!(token_balance(&mut context, pdas.fee_vault).await, 0);
    assert_eq!(token_balance(&mut context, buyer_collateral).await, 993);
    let pool = pool_state(&mut context, pdas.pool).await;
    assert_eq!(pool.ptoken_supply, 6);
    assert_eq!(pool.collateral_supply, 17);
    assert_eq!(pool.outstanding_ptokens, 4);

    // request_burn(4): personal vault drains into the escrow, burn cost paid
    let (burn_escrow, _) = Pubkey::find_program_address(
        &[b"burn", pdas.pool.as_ref(), buyer.pubkey().as_ref()],
        &prob_pool::ID,
    );
    let request_burn = Instruction {
        program_id: prob_pool::ID,
        accounts: prob_pool::accounts::RequestBurn {
            user: buyer.pubkey(),
            config: pdas.config,
            pool: pdas.pool,
            collateral_mint,
            ptoken_mint: pdas.ptoken_mint,
            user_collateral: buyer_collateral,
            fee_vault: pdas.fee_vault,
            user_ptoken_vault,
            burn_escrow,
            token_program: spl_token::ID,
            associated_token_program: AssociatedToken::id(),
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: prob_pool::instruction::RequestBurn { ptoken_amount: 4 }.data(),
    };
    send(&mut context, request_burn, &buyer).await.unwrap();

    assert_eq!(token_balance(&mut context, burn_escrow).await, 4);
    assert_eq!(token_balance(&mut context, user_ptoken_vault).await, 0);
    assert_eq!(token_balance(&mut context, pdas.fee_vault).await, 5);
    assert_eq!(token_balance(&mut context, buyer_collateral).await, 988);

    // execute_burn(4): whatever the draw, the escrow ends at exactly zero
    // and the burned tickets leave circulation
    context.warp_to_slot(5).unwrap();
    let execute_burn = Instruction {
        program_id: prob_pool::ID,
        accounts: prob_pool::accounts::ExecuteBurn {
            authority: creator.pubkey(),
            user: buyer.pubkey(),
            config: pdas.config,
            pool: pdas.pool,
            ptoken_mint: pdas.ptoken_mint,
            burn_escrow,
            slot_hashes: sysvar::slot_hashes::id(),
            token_program: spl_token::ID,
        }
        .to_account_metas(None),
        data: prob_pool::instruction::ExecuteBurn { ptoken_amount: 4 }.data(),
    };
    send(&mut context, execute_burn, &creator).await.unwrap();

    assert_eq!(token_balance(&mut context, burn_escrow).await, 0);
    let pool = pool_state(&mut context, pdas.pool).await;
    assert_eq!(pool.outstanding_ptokens, 0);
    assert_eq!(pool.ptoken_supply, 6);
    if pool.claimed {
        assert_eq!(pool.asset_authority, buyer.pubkey());
    } else {
        assert_eq!(pool.asset_authority, creator.pubkey());
    }

    let mint_account = context
        .banks_client
        .get_account(pdas.ptoken_mint)
        .await
        .unwrap()
        .unwrap();
    let supply = spl_token::state::Mint::unpack(&mint_account.data).unwrap().supply;
    assert_eq!(supply, 6);
}

/// Settlement paths against a pre-seeded claimed pool: the winner claims the
/// asset exactly once, a second claim fails with the vault empty, and a burn
/// request left pending when the pool was won can no longer be executed.
#[tokio::test]
async fn claimed_pool_settles_once() {
    let resolver = Keypair::new();
    let winner = Keypair::new();
    let loser = Keypair::new();
    let collateral_mint = Pubkey::new_unique();
    let asset_mint = Pubkey::new_unique();
    let pdas = derive_pdas(&collateral_mint, &asset_mint);
    let config_bump = Pubkey::find_program_address(&[b"config"], &prob_pool::ID).1;
    let pool_bump = Pubkey::find_program_address(&[b"pool", asset_mint.as_ref()], &prob_pool::ID).1;
    let (burn_escrow, _) = Pubkey::find_program_address(
        &[b"burn", pdas.pool.as_ref(), loser.pubkey().as_ref()],
        &prob_pool::ID,
    );

    let mut pt = program_test();
    pt.add_account(resolver.pubkey(), system_account(FUNDING));
    pt.add_account(winner.pubkey(), system_account(FUNDING));
    pt.add_account(collateral_mint, packed_mint(1_000_000, COption::None));
    pt.add_account(asset_mint, packed_mint(1, COption::None));
    pt.add_account(
        pdas.config,
        anchor_account(&GlobalConfig {
            authority: resolver.pubkey(),
            collateral_mint,
            fee_vault: pdas.fee_vault,
            swap_fee: 250,
            fee_scalar: 10_000,
            burn_cost: 5,
            collateral_init_min: 10,
            collateral_init_max: 1_000,
            ptoken_init_min: 2,
            ptoken_init_max: 500,
            bump: config_bump,
        }),
    );
    // A pool already won: 4 of 10 tickets sold, 1 burned to win, 3 still
    // escrowed by another user whose request was never executed
    pt.add_account(
        pdas.pool,
        anchor_account(&ProbPool {
            creator: resolver.pubkey(),
            asset_authority: winner.pubkey(),
            collateral_vault: pdas.collateral_vault,
            ptoken_vault: pdas.pool_ptoken_vault,
            ptoken_mint: pdas.ptoken_mint,
            asset_mint,
            claimed: true,
            collateral_supply: 17,
            ptoken_supply: 6,
            outstanding_ptokens: 3,
            bump: pool_bump,
        }),
    );
    pt.add_account(
        pdas.ptoken_mint,
        packed_mint(9, COption::Some(pdas.ptoken_mint)),
    );
    pt.add_account(
        pdas.asset_vault,
        packed_token_account(asset_mint, pdas.asset_vault, 1),
    );
    pt.add_account(
        burn_escrow,
        packed_token_account(pdas.ptoken_mint, burn_escrow, 3),
    );
    let mut context = pt.start_with_context().await;

    // The leftover burn request is terminal: the pool is no longer open
    let execute_burn = Instruction {
        program_id: prob_pool::ID,
        accounts: prob_pool::accounts::ExecuteBurn {
            authority: resolver.pubkey(),
            user: loser.pubkey(),
            config: pdas.config,
            pool: pdas.pool,
            ptoken_mint: pdas.ptoken_mint,
            burn_escrow,
            slot_hashes: sysvar::slot_hashes::id(),
            token_program: spl_token::ID,
        }
        .to_account_metas(None),
        data: prob_pool::instruction::ExecuteBurn { ptoken_amount: 3 }.data(),
    };
    let err = send(&mut context, execute_burn, &resolver).await.unwrap_err();
    assert_eq!(custom_error(err), u32::from(ExecuteBurnError::InvalidState));
    assert_eq!(token_balance(&mut context, burn_escrow).await, 3);

    // First claim moves the one escrowed unit to the winner
    let winner_asset = get_associated_token_address(&winner.pubkey(), &asset_mint);
    let claim = Instruction {
        program_id: prob_pool::ID,
        accounts: prob_pool::accounts::ClaimAsset {
            winner: winner.pubkey(),
            pool: pdas.pool,
            asset_mint,
            asset_vault: pdas.asset_vault,
            winner_asset,
            token_program: spl_token::ID,
            associated_token_program: AssociatedToken::id(),
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: prob_pool::instruction::ClaimAsset {}.data(),
    };
    send(&mut context, claim.clone(), &winner).await.unwrap();

    assert_eq!(token_balance(&mut context, winner_asset).await, 1);
    assert_eq!(token_balance(&mut context, pdas.asset_vault).await, 0);

    // Second claim finds the vault drained
    context.get_new_latest_blockhash().await.unwrap();
    let err = send(&mut context, claim, &winner).await.unwrap_err();
    assert_eq!(custom_error(err), u32::from(ClaimAssetError::NothingToClaim));
}
