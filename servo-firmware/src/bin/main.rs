#![no_std]
#![no_main]

use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::i2c_slave::{self, I2cSlave};
use embassy_rp::peripherals::{I2C0, I2C1, UART1};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{Config as UartConfig, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use servo_core::config::SupervisorConfig;
use servo_core::convert::percent_to_compare;
use servo_core::events::MODE_CHANGED;
use servo_core::InputMode;
use servo_firmware::accel::FULL_SCALE_COUNTS;
use servo_firmware::{
    serve_mirror, ActuatorDriver, ActuatorTask, CommandQueue, ConsoleTask, EventFlags, Lis3dh,
    MirrorRegisters, MirrorTask, ModeSupervisor, PwmReadback, PwmServos, UartConsole,
    BOARD_TIMING, DEFAULT_CONFIG, MIRROR_ADDRESS,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => embassy_rp::uart::InterruptHandler<UART1>;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

type Mutex = CriticalSectionRawMutex;
type Accel = Lis3dh<I2c<'static, I2C0, i2c::Async>>;

/// Commands from every input source to the actuator task.
static QUEUE: CommandQueue<Mutex> = CommandQueue::new();
/// Mode and refresh flags.
static FLAGS: EventFlags<Mutex> = EventFlags::new();
/// Register image served on I2C1.
static MIRROR: MirrorRegisters = MirrorRegisters::new();

const SUPERVISOR: SupervisorConfig = SupervisorConfig {
    full_scale_counts: FULL_SCALE_COUNTS,
    ..DEFAULT_CONFIG.supervisor
};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("servo controller starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Servos: both centred ---
    let pwm = Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_0, p.PIN_1, PwmConfig::default());
    let servos = PwmServos::new(pwm, percent_to_compare(&BOARD_TIMING, 50));

    // --- Console ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 115_200;
    let uart = Uart::new(
        p.UART1,
        p.PIN_8, // TX
        p.PIN_9, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );

    // --- Accelerometer ---
    let i2c0 = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c::Config::default());
    let mut accel = Lis3dh::new(i2c0);
    if let Err(e) = accel.init().await {
        error!("accelerometer init failed: {:?}", e);
    }

    // --- Mirror target ---
    let mut target_config = i2c_slave::Config::default();
    target_config.addr = MIRROR_ADDRESS;
    let target = I2cSlave::new(p.I2C1, p.PIN_19, p.PIN_18, Irqs, target_config);

    let led = Output::new(p.PIN_25, Level::Low);

    let actuator = ActuatorTask::new(ActuatorDriver::new(servos, BOARD_TIMING), &QUEUE, &FLAGS);
    let supervisor = ModeSupervisor::new(accel, &QUEUE, &FLAGS, SUPERVISOR);
    let console = ConsoleTask::new(UartConsole::new(uart), PwmReadback, BOARD_TIMING, &QUEUE, &FLAGS);
    let mirror = MirrorTask::new(PwmReadback, BOARD_TIMING, &MIRROR, &FLAGS);

    spawner.spawn(actuator_task(actuator).unwrap());
    spawner.spawn(supervisor_task(supervisor).unwrap());
    spawner.spawn(console_task(console).unwrap());
    spawner.spawn(mirror_task(mirror).unwrap());
    spawner.spawn(i2c_target_task(target).unwrap());
    spawner.spawn(mode_led_task(led).unwrap());

    info!("servo controller running");
}

#[embassy_executor::task]
async fn actuator_task(mut task: ActuatorTask<'static, Mutex, PwmServos<'static>>) {
    task.run().await
}

#[embassy_executor::task]
async fn supervisor_task(mut task: ModeSupervisor<'static, Mutex, Accel>) {
    task.run().await
}

#[embassy_executor::task]
async fn console_task(mut task: ConsoleTask<'static, Mutex, UartConsole<'static>, PwmReadback>) {
    task.run().await
}

#[embassy_executor::task]
async fn mirror_task(mut task: MirrorTask<'static, Mutex, PwmReadback, &'static MirrorRegisters>) {
    task.run().await
}

#[embassy_executor::task]
async fn i2c_target_task(mut target: I2cSlave<'static, I2C1>) {
    serve_mirror(&mut target, &MIRROR).await
}

/// LED on while the accelerometer is in control.
#[embassy_executor::task]
async fn mode_led_task(mut led: Output<'static>) {
    loop {
        FLAGS.wait_and_clear(MODE_CHANGED).await;
        if FLAGS.mode() == InputMode::Motion {
            led.set_high();
        } else {
            led.set_low();
        }
    }
}
